use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use contracts::usecases::u501_weekly_accounting::{TriggerRequest, TriggerResponse, TriggerStatus};

use crate::shared::error::ApiError;
use crate::shared::state::AppState;
use crate::usecases::u501_weekly_accounting::service;

/// POST /api/u501/weekly-accounting/trigger
///
/// 202 если расчёт запущен, 200 если отчёт уже рассчитан.
pub async fn trigger(
    State(state): State<AppState>,
    Json(request): Json<TriggerRequest>,
) -> Result<(StatusCode, Json<TriggerResponse>), ApiError> {
    tracing::info!(
        "U501: trigger mode={:?} week={:?} force={}",
        request.mode,
        request.week_id,
        request.force_recalculate
    );
    let response = service::trigger(&state, request).await?;
    let status = match response.status {
        TriggerStatus::Started => StatusCode::ACCEPTED,
        TriggerStatus::AlreadyCalculated => StatusCode::OK,
    };
    Ok((status, Json(response)))
}
