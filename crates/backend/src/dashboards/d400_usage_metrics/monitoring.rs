//! Клиент API мониторинга: чтение временных рядов одной метрики.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Точка ряда: значение за интервал, заканчивающийся в `end_time`
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    pub end_time: DateTime<Utc>,
    pub value: f64,
    pub labels: HashMap<String, String>,
}

/// Источник временных рядов
#[async_trait]
pub trait TimeSeriesSource: Send + Sync {
    async fn fetch(
        &self,
        metric: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MetricPoint>>;
}

pub struct MonitoringClient {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
    access_token: String,
}

impl MonitoringClient {
    pub fn new(base_url: &str, project_id: &str, access_token: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to build monitoring HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            access_token: access_token.to_string(),
        })
    }

    fn series_url(&self) -> String {
        format!("{}/projects/{}/timeSeries", self.base_url, self.project_id)
    }
}

#[async_trait]
impl TimeSeriesSource for MonitoringClient {
    async fn fetch(
        &self,
        metric: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MetricPoint>> {
        let filter = format!("metric.type=\"{}\"", metric);
        let start = start.to_rfc3339_opts(SecondsFormat::Secs, true);
        let end = end.to_rfc3339_opts(SecondsFormat::Secs, true);

        let mut points = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut query: Vec<(&str, &str)> = vec![
                ("filter", filter.as_str()),
                ("interval.startTime", start.as_str()),
                ("interval.endTime", end.as_str()),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let response = self
                .client
                .get(self.series_url())
                .bearer_auth(&self.access_token)
                .query(&query)
                .send()
                .await
                .with_context(|| format!("Monitoring request for {} failed", metric))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                anyhow::bail!("Monitoring API returned HTTP {} for {}: {}", status.as_u16(), metric, body);
            }

            let text = response.text().await?;
            let page = parse_series(&text)?;
            points.extend(page.points);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!("Monitoring {}: {} point(s)", metric, points.len());
        Ok(points)
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListTimeSeriesResponse {
    #[serde(default)]
    time_series: Vec<TimeSeries>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TimeSeries {
    #[serde(default)]
    metric: MetricDescriptor,
    #[serde(default)]
    points: Vec<Point>,
}

#[derive(Debug, Default, Deserialize)]
struct MetricDescriptor {
    #[serde(default)]
    labels: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct Point {
    interval: Interval,
    value: TypedValue,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Interval {
    end_time: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypedValue {
    #[serde(default)]
    int64_value: Option<Int64>,
    #[serde(default)]
    double_value: Option<f64>,
}

/// int64 в JSON приходит строкой, но числом тоже примем
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Int64 {
    Text(String),
    Number(i64),
}

impl TypedValue {
    fn as_f64(&self) -> Option<f64> {
        match (&self.int64_value, self.double_value) {
            (Some(Int64::Number(n)), _) => Some(*n as f64),
            (Some(Int64::Text(s)), _) => s.trim().parse::<i64>().ok().map(|n| n as f64),
            (None, Some(d)) => Some(d),
            (None, None) => None,
        }
    }
}

struct SeriesPage {
    points: Vec<MetricPoint>,
    next_page_token: Option<String>,
}

fn parse_series(body: &str) -> Result<SeriesPage> {
    let response: ListTimeSeriesResponse =
        serde_json::from_str(body).context("Unexpected monitoring response")?;

    let mut points = Vec::new();
    for series in response.time_series {
        for point in series.points {
            let Some(value) = point.value.as_f64() else {
                continue;
            };
            points.push(MetricPoint {
                end_time: point.interval.end_time,
                value,
                labels: series.metric.labels.clone(),
            });
        }
    }

    Ok(SeriesPage {
        points,
        next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_series() {
        let body = r#"{
            "timeSeries": [
                {
                    "metric": { "type": "x", "labels": { "method": "RunQuery" } },
                    "points": [
                        { "interval": { "startTime": "2025-01-06T10:00:00Z", "endTime": "2025-01-06T10:01:00Z" },
                          "value": { "int64Value": "42" } },
                        { "interval": { "endTime": "2025-01-06T10:02:00Z" },
                          "value": { "int64Value": 7 } }
                    ]
                },
                {
                    "points": [
                        { "interval": { "endTime": "2025-01-06T10:03:00Z" },
                          "value": { "doubleValue": 1.5 } },
                        { "interval": { "endTime": "2025-01-06T10:04:00Z" },
                          "value": { "stringValue": "n/a" } }
                    ]
                }
            ],
            "nextPageToken": ""
        }"#;

        let page = parse_series(body).unwrap();
        let values: Vec<f64> = page.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![42.0, 7.0, 1.5]);
        assert_eq!(page.points[0].labels.get("method").map(String::as_str), Some("RunQuery"));
        assert!(page.points[2].labels.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn test_parse_empty_and_garbage() {
        assert!(parse_series("{}").unwrap().points.is_empty());
        assert!(parse_series("<html>").is_err());
    }

    #[test]
    fn test_series_url() {
        let client = MonitoringClient::new("https://example.test/v3/", "proj", "tok").unwrap();
        assert_eq!(client.series_url(), "https://example.test/v3/projects/proj/timeSeries");
    }
}
