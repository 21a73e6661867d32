use axum::extract::{Path, Query, State};
use axum::Json;
use contracts::domain::a003_archived_product::aggregate::{
    ArchiveStatusRequest, ArchiveStatusResponse, ArchivedListQuery, ArchivedProduct,
};
use serde_json::{json, Value};

use crate::domain::a003_archived_product::service;
use crate::shared::error::ApiError;
use crate::shared::state::AppState;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/a003/products/archived?collection=shop_products|products
pub async fn list_archived(
    State(state): State<AppState>,
    Query(query): Query<ArchivedListQuery>,
) -> Result<Json<Vec<ArchivedProduct>>, ApiError> {
    Ok(Json(service::list_archived(&state, query.collection).await?))
}

/// GET /api/a003/products/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ArchivedProduct>, ApiError> {
    Ok(Json(service::get_by_id(&state, &id).await?))
}

/// POST /api/a003/products/:id/archive-status
pub async fn set_archive_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<ArchiveStatusRequest>,
) -> Result<Json<ArchiveStatusResponse>, ApiError> {
    let response = service::set_archive_status(&state, &id, request, user.username()).await?;
    Ok(Json(response))
}

/// POST /api/a003/products/import
pub async fn import(
    State(state): State<AppState>,
    Json(products): Json<Vec<ArchivedProduct>>,
) -> Result<Json<Value>, ApiError> {
    let count = service::import(&state, products).await?;
    Ok(Json(json!({ "imported": count })))
}
