#![allow(
    clippy::useless_format,
    clippy::type_complexity,
    clippy::too_many_arguments,
    clippy::derivable_impls
)]

pub mod dashboards;
pub mod domain;
pub mod handlers;
pub mod projections;
pub mod routes;
pub mod shared;
pub mod system;
pub mod usecases;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::http::{header, Method};
    use axum::middleware;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};

    use crate::shared::config;
    use crate::shared::state::AppState;
    use crate::system::middleware::request_logger::request_logger;
    use crate::usecases::u501_weekly_accounting::AccountingScheduler;

    system::tracing::initialize()?;

    let config = config::load_config()?;

    // Initialize database
    let db_path = config::get_database_path(&config);
    let db = shared::data::db::initialize_database(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize database: {}", e))?;

    let jwt_secret = system::auth::jwt::load_or_create_secret(&db).await?;
    system::initialization::ensure_admin_user_exists(&db, &config.admin).await?;
    system::initialization::recover_interrupted_reports(&db).await?;

    let port = config.server.port;
    let state = AppState::new(db, config, jwt_secret)?;

    if state.config.accounting.enabled {
        let scheduler =
            AccountingScheduler::new(state.clone(), &state.config.accounting.schedule_cron)?;
        tokio::spawn(scheduler.run_loop());
        tracing::info!(
            "Weekly accounting scheduler started ({})",
            state.config.accounting.schedule_cron
        );
    } else {
        tracing::info!("Weekly accounting scheduler disabled");
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    let app = routes::configure_routes(state)
        .layer(middleware::from_fn(request_logger))
        .layer(cors);

    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
