use axum::extract::State;
use axum::Json;
use contracts::domain::a005_shop::aggregate::{Shop, ShopDto};

use crate::domain::a005_shop::service;
use crate::shared::error::ApiError;
use crate::shared::state::AppState;

/// GET /api/a005/shops
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<Shop>>, ApiError> {
    Ok(Json(service::list_all(&state).await?))
}

/// POST /api/a005/shops
pub async fn upsert(
    State(state): State<AppState>,
    Json(dto): Json<ShopDto>,
) -> Result<Json<Shop>, ApiError> {
    Ok(Json(service::upsert(&state, dto).await?))
}
