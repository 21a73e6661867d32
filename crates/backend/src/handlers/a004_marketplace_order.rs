use axum::extract::State;
use axum::Json;
use contracts::domain::a004_marketplace_order::aggregate::{OrderImportResult, OrderLineDto};

use crate::domain::a004_marketplace_order::service;
use crate::shared::error::ApiError;
use crate::shared::state::AppState;

/// POST /api/a004/order-lines/import
pub async fn import(
    State(state): State<AppState>,
    Json(lines): Json<Vec<OrderLineDto>>,
) -> Result<Json<OrderImportResult>, ApiError> {
    Ok(Json(service::import(&state, lines).await?))
}
