use axum::extract::{Path, Query, State};
use axum::Json;
use contracts::projections::p900_weekly_accounting::dto::{
    ReportListQuery, SalesPage, SalesPageQuery, SetPaidRequest, WeeklyReport,
};

use crate::projections::p900_weekly_accounting::service;
use crate::shared::error::ApiError;
use crate::shared::state::AppState;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/p900/weekly-reports?year=2025&month=1
pub async fn list_for_month(
    State(state): State<AppState>,
    Query(query): Query<ReportListQuery>,
) -> Result<Json<Vec<WeeklyReport>>, ApiError> {
    Ok(Json(service::list_for_month(&state, query.year, query.month).await?))
}

/// GET /api/p900/weekly-reports/:week_id
pub async fn get_report(
    State(state): State<AppState>,
    Path(week_id): Path<String>,
) -> Result<Json<WeeklyReport>, ApiError> {
    Ok(Json(service::get_report(&state, &week_id).await?))
}

/// GET /api/p900/weekly-reports/:week_id/sales?sort_by=revenue&limit=20&after=<seller_id>
pub async fn sales_page(
    State(state): State<AppState>,
    Path(week_id): Path<String>,
    Query(query): Query<SalesPageQuery>,
) -> Result<Json<SalesPage>, ApiError> {
    Ok(Json(service::sales_page(&state, &week_id, &query).await?))
}

/// PUT /api/p900/weekly-reports/:week_id/paid
pub async fn set_paid(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(week_id): Path<String>,
    Json(request): Json<SetPaidRequest>,
) -> Result<Json<WeeklyReport>, ApiError> {
    let report = service::set_paid(&state, &week_id, request.is_paid, user.username()).await?;
    Ok(Json(report))
}
