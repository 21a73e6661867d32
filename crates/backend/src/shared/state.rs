use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::dashboards::d400_usage_metrics::monitoring::{MonitoringClient, TimeSeriesSource};
use crate::shared::config::{resolve_path, Config};
use crate::shared::live::ChangeHub;
use crate::shared::storage::BlobStorage;

/// Общее состояние, которое получают все обработчики
///
/// | Поле | Назначение |
/// |------|------------|
/// | db | SQLite через sea-orm |
/// | config | конфигурация из config.toml |
/// | storage | картинки баннеров |
/// | live | рассылка изменений в `/api/live` |
/// | jwt_secret | подпись access-токенов |
/// | monitoring | источник метрик, `None` без учётных данных |
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub storage: BlobStorage,
    pub live: ChangeHub,
    pub jwt_secret: Arc<String>,
    pub monitoring: Option<Arc<dyn TimeSeriesSource>>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config, jwt_secret: String) -> anyhow::Result<Self> {
        let storage = BlobStorage::new(
            resolve_path(&config.storage.root),
            &config.storage.public_url_prefix,
        );

        let monitoring: Option<Arc<dyn TimeSeriesSource>> =
            match config.monitoring.credentials() {
                Some((project, token)) => {
                    tracing::info!("Usage metrics: monitoring project {}", project);
                    Some(Arc::new(MonitoringClient::new(
                        &config.monitoring.base_url,
                        project,
                        token,
                    )?))
                }
                None => {
                    tracing::info!("Usage metrics: no monitoring credentials, synthetic data");
                    None
                }
            };

        Ok(Self {
            db,
            config: Arc::new(config),
            storage,
            live: ChangeHub::new(),
            jwt_secret: Arc::new(jwt_secret),
            monitoring,
        })
    }

    /// Состояние для тестов: временная база и хранилище
    #[cfg(test)]
    pub async fn for_tests() -> (tempfile::TempDir, Self) {
        let (dir, db) = crate::shared::data::db::test_database().await;
        let config: Config = toml::from_str("[database]\npath = \"test.db\"\n").expect("config");
        let storage = BlobStorage::new(dir.path().join("storage"), "/files");
        let state = Self {
            db,
            config: Arc::new(config),
            storage,
            live: ChangeHub::new(),
            jwt_secret: Arc::new("test-secret".to_string()),
            monitoring: None,
        };
        (dir, state)
    }
}
