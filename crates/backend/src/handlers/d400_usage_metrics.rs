use axum::extract::{Query, State};
use axum::Json;
use contracts::dashboards::d400_usage_metrics::{MetricsRange, UsageMetricsQuery, UsageMetricsResponse};

use crate::dashboards::d400_usage_metrics::service;
use crate::shared::error::ApiError;
use crate::shared::state::AppState;

/// GET /api/d400/usage-metrics?range=hour|day
pub async fn usage_metrics(
    State(state): State<AppState>,
    Query(query): Query<UsageMetricsQuery>,
) -> Result<Json<UsageMetricsResponse>, ApiError> {
    let range = match query.range.as_deref() {
        Some(raw) => raw.parse::<MetricsRange>().map_err(ApiError::BadRequest)?,
        None => MetricsRange::default(),
    };
    let response = service::usage_metrics(&state, range).await;
    tracing::info!(
        "D400: {} metrics, source {:?}, {} bucket(s)",
        range.as_str(),
        response.source,
        response.buckets.len()
    );
    Ok(Json(response))
}
