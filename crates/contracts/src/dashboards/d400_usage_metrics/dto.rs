use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Time window of the usage chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MetricsRange {
    /// Last 60 minutes, 12 slots of 5 minutes
    #[default]
    Hour,
    /// Last 24 hours, 24 slots of 1 hour
    Day,
}

impl MetricsRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricsRange::Hour => "hour",
            MetricsRange::Day => "day",
        }
    }

    pub fn slot_count(&self) -> usize {
        match self {
            MetricsRange::Hour => 12,
            MetricsRange::Day => 24,
        }
    }

    pub fn slot_minutes(&self) -> i64 {
        match self {
            MetricsRange::Hour => 5,
            MetricsRange::Day => 60,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MetricsRange::Hour => "Последний час",
            MetricsRange::Day => "Последние сутки",
        }
    }
}

impl FromStr for MetricsRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "hour" => Ok(MetricsRange::Hour),
            "day" => Ok(MetricsRange::Day),
            other => Err(format!("Unknown metrics range: {}", other)),
        }
    }
}

/// Query string of `GET /api/d400/usage-metrics`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageMetricsQuery {
    #[serde(default)]
    pub range: Option<String>,
}

/// One time slot of the chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsBucket {
    /// Slot start in UTC, "HH:MM"
    pub label: String,
    pub start: DateTime<Utc>,
    pub reads: u64,
    pub writes: u64,
    pub functions: u64,
}

/// Where the numbers came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricsSource {
    /// Monitoring API
    Live,
    /// Fallback generator (no credentials or the monitoring API failed)
    Synthetic,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsTotals {
    pub reads: u64,
    pub writes: u64,
    pub functions: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageMetricsResponse {
    pub range: MetricsRange,
    pub source: MetricsSource,
    pub buckets: Vec<MetricsBucket>,
    pub totals: MetricsTotals,
    pub generated_at: DateTime<Utc>,
}

impl MetricsTotals {
    pub fn from_buckets(buckets: &[MetricsBucket]) -> Self {
        buckets.iter().fold(Self::default(), |acc, b| Self {
            reads: acc.reads + b.reads,
            writes: acc.writes + b.writes,
            functions: acc.functions + b.functions,
        })
    }
}
