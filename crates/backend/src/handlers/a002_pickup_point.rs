use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a002_pickup_point::aggregate::{
    PickupPoint, PickupPointActiveDto, PickupPointDto,
};

use crate::domain::a002_pickup_point::service;
use crate::shared::error::ApiError;
use crate::shared::state::AppState;

/// GET /api/a002/pickup-points
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<PickupPoint>>, ApiError> {
    Ok(Json(service::list_all(&state).await?))
}

/// GET /api/a002/pickup-points/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PickupPoint>, ApiError> {
    Ok(Json(service::get_by_id(&state, &id).await?))
}

/// POST /api/a002/pickup-points
///
/// Без `id` создаёт точку, с `id` обновляет существующую.
pub async fn upsert(
    State(state): State<AppState>,
    Json(dto): Json<PickupPointDto>,
) -> Result<Json<PickupPoint>, ApiError> {
    Ok(Json(service::upsert(&state, dto).await?))
}

/// PATCH /api/a002/pickup-points/:id/active
pub async fn set_active(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<PickupPointActiveDto>,
) -> Result<Json<PickupPoint>, ApiError> {
    Ok(Json(service::set_active(&state, &id, dto.is_active).await?))
}

/// DELETE /api/a002/pickup-points/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service::delete(&state, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
