use contracts::dashboards::d400_usage_metrics::{MetricsRange, UsageMetricsResponse};

use crate::shared::api_utils::{get_json, message};

/// Счётчики чтений, записей и вызовов функций за выбранное окно
pub async fn fetch_usage_metrics(range: MetricsRange) -> Result<UsageMetricsResponse, String> {
    get_json(&format!("/api/d400/usage-metrics?range={}", range.as_str()))
        .await
        .map_err(message)
}
