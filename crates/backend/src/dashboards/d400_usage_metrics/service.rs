use anyhow::Result;
use chrono::{DateTime, Utc};
use contracts::dashboards::d400_usage_metrics::{
    MetricsBucket, MetricsRange, MetricsSource, MetricsTotals, UsageMetricsResponse,
};

use super::buckets::{fill_buckets, window};
use super::fallback::synthetic;
use super::monitoring::TimeSeriesSource;
use crate::shared::config::MonitoringConfig;
use crate::shared::state::AppState;

/// Метрики за окно. Никогда не падает: при любой проблеме отдаёт синтетику.
pub async fn usage_metrics(state: &AppState, range: MetricsRange) -> UsageMetricsResponse {
    usage_metrics_at(
        state.monitoring.as_deref(),
        &state.config.monitoring,
        range,
        Utc::now(),
    )
    .await
}

pub(crate) async fn usage_metrics_at(
    source: Option<&dyn TimeSeriesSource>,
    config: &MonitoringConfig,
    range: MetricsRange,
    now: DateTime<Utc>,
) -> UsageMetricsResponse {
    let (start, end) = window(range, now);

    let (source_kind, buckets) = match source {
        Some(source) => match fetch_live(source, config, range, start, end).await {
            Ok(buckets) => (MetricsSource::Live, buckets),
            Err(e) => {
                tracing::warn!("Usage metrics: monitoring query failed, using synthetic data: {:#}", e);
                (MetricsSource::Synthetic, synthetic(range, start))
            }
        },
        None => (MetricsSource::Synthetic, synthetic(range, start)),
    };

    UsageMetricsResponse {
        range,
        source: source_kind,
        totals: MetricsTotals::from_buckets(&buckets),
        buckets,
        generated_at: now,
    }
}

async fn fetch_live(
    source: &dyn TimeSeriesSource,
    config: &MonitoringConfig,
    range: MetricsRange,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<MetricsBucket>> {
    let (documents, functions) = tokio::join!(
        source.fetch(&config.document_ops_metric, start, end),
        source.fetch(&config.function_executions_metric, start, end),
    );
    Ok(fill_buckets(range, start, &documents?, &functions?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d400_usage_metrics::monitoring::MetricPoint;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::HashMap;

    struct FixedSource {
        fail_functions: bool,
    }

    #[async_trait]
    impl TimeSeriesSource for FixedSource {
        async fn fetch(
            &self,
            metric: &str,
            start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> Result<Vec<MetricPoint>> {
            let config = MonitoringConfig::default();
            if metric == config.function_executions_metric {
                if self.fail_functions {
                    anyhow::bail!("permission denied");
                }
                return Ok(vec![MetricPoint {
                    end_time: start + chrono::Duration::minutes(1),
                    value: 9.0,
                    labels: HashMap::new(),
                }]);
            }
            let mut labels = HashMap::new();
            labels.insert("method".to_string(), "RunQuery".to_string());
            Ok(vec![MetricPoint {
                end_time: start + chrono::Duration::minutes(2),
                value: 40.0,
                labels,
            }])
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 6, 10, 7, 31).unwrap()
    }

    #[tokio::test]
    async fn test_live_metrics() {
        let source = FixedSource { fail_functions: false };
        let config = MonitoringConfig::default();
        let response = usage_metrics_at(Some(&source), &config, MetricsRange::Hour, now()).await;
        assert_eq!(response.source, MetricsSource::Live);
        assert_eq!(response.buckets.len(), 12);
        assert_eq!(response.buckets[0].reads, 40);
        assert_eq!(response.buckets[0].functions, 9);
        assert_eq!(response.totals.reads, 40);
        assert_eq!(response.totals.writes, 0);
    }

    #[tokio::test]
    async fn test_failure_falls_back() {
        let source = FixedSource { fail_functions: true };
        let config = MonitoringConfig::default();
        let response = usage_metrics_at(Some(&source), &config, MetricsRange::Day, now()).await;
        assert_eq!(response.source, MetricsSource::Synthetic);
        assert_eq!(response.buckets.len(), 24);
    }

    #[tokio::test]
    async fn test_without_credentials() {
        let (_dir, state) = AppState::for_tests().await;
        let response = usage_metrics(&state, MetricsRange::Hour).await;
        assert_eq!(response.source, MetricsSource::Synthetic);
        assert_eq!(response.buckets.len(), 12);
    }
}
