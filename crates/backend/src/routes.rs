use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::handlers;
use crate::shared::config::resolve_path;
use crate::shared::state::AppState;
use crate::shared::storage::MAX_FILE_SIZE;
use crate::system::{self, auth::middleware::require_auth};

/// Запас на служебные части multipart сверх размера файла
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    let protected = Router::new()
        // ========================================
        // A001 BANNERS
        // ========================================
        .route("/api/a001/banners", get(handlers::a001_banner::list))
        .route(
            "/api/a001/banners/upload",
            post(handlers::a001_banner::upload)
                .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + MULTIPART_OVERHEAD)),
        )
        .route(
            "/api/a001/banners/:id",
            get(handlers::a001_banner::get_by_id).delete(handlers::a001_banner::delete),
        )
        .route(
            "/api/a001/banners/:id/link",
            put(handlers::a001_banner::set_link),
        )
        // ========================================
        // A002 PICKUP POINTS
        // ========================================
        .route(
            "/api/a002/pickup-points",
            get(handlers::a002_pickup_point::list_all).post(handlers::a002_pickup_point::upsert),
        )
        .route(
            "/api/a002/pickup-points/:id",
            get(handlers::a002_pickup_point::get_by_id)
                .delete(handlers::a002_pickup_point::delete),
        )
        .route(
            "/api/a002/pickup-points/:id/active",
            patch(handlers::a002_pickup_point::set_active),
        )
        // ========================================
        // A003 ARCHIVED PRODUCTS
        // ========================================
        .route(
            "/api/a003/products/archived",
            get(handlers::a003_archived_product::list_archived),
        )
        .route(
            "/api/a003/products/import",
            post(handlers::a003_archived_product::import),
        )
        .route(
            "/api/a003/products/:id",
            get(handlers::a003_archived_product::get_by_id),
        )
        .route(
            "/api/a003/products/:id/archive-status",
            post(handlers::a003_archived_product::set_archive_status),
        )
        // A004 / A005: источники для недельного расчёта
        .route(
            "/api/a004/order-lines/import",
            post(handlers::a004_marketplace_order::import),
        )
        .route(
            "/api/a005/shops",
            get(handlers::a005_shop::list_all).post(handlers::a005_shop::upsert),
        )
        // ========================================
        // P900 WEEKLY ACCOUNTING
        // ========================================
        .route(
            "/api/p900/weekly-reports",
            get(handlers::p900_weekly_accounting::list_for_month),
        )
        .route(
            "/api/p900/weekly-reports/:week_id",
            get(handlers::p900_weekly_accounting::get_report),
        )
        .route(
            "/api/p900/weekly-reports/:week_id/sales",
            get(handlers::p900_weekly_accounting::sales_page),
        )
        .route(
            "/api/p900/weekly-reports/:week_id/paid",
            put(handlers::p900_weekly_accounting::set_paid),
        )
        .route(
            "/api/u501/weekly-accounting/trigger",
            post(handlers::u501_weekly_accounting::trigger),
        )
        // ========================================
        // D400 USAGE METRICS, TAXONOMY
        // ========================================
        .route(
            "/api/d400/usage-metrics",
            get(handlers::d400_usage_metrics::usage_metrics),
        )
        .route("/api/taxonomy", get(handlers::taxonomy::tree))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let static_dir = resolve_path(&state.config.server.static_dir);
    let spa = ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html")));
    let files = ServeDir::new(state.storage.root());
    let files_prefix = state.config.storage.public_url_prefix.trim_end_matches('/').to_string();

    Router::new()
        .merge(system::api::routes::configure_system_routes(state.clone()))
        // EventSource не умеет заголовки, токен приходит в query
        .route("/api/live", get(handlers::live::stream))
        .merge(protected)
        .nest_service(&files_prefix, files)
        .fallback_service(spa)
        .with_state(state)
}
