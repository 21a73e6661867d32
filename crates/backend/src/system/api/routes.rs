use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::system::handlers;
use crate::shared::state::AppState;
use crate::system::auth;

/// Системные роуты: вход, обновление токена, публичная конфигурация
pub fn configure_system_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // ========================================
        // HEALTH CHECK
        // ========================================
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SYSTEM AUTH ROUTES (PUBLIC)
        // ========================================
        .route("/api/system/auth/login", post(handlers::auth::login))
        .route("/api/system/auth/refresh", post(handlers::auth::refresh))
        .route("/api/system/auth/logout", post(handlers::auth::logout))
        .route("/api/system/config/public", get(handlers::config::public_config))
        // System auth routes (protected)
        .route(
            "/api/system/auth/me",
            get(handlers::auth::current_user).layer(middleware::from_fn_with_state(
                state,
                auth::middleware::require_auth,
            )),
        )
}
