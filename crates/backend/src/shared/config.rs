use contracts::shared::format::Currency;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub maps: MapsConfig,
    #[serde(default)]
    pub accounting: AccountingConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Каталог собранного фронтенда
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> String {
    "dist".to_string()
}

/// Файловое хранилище картинок баннеров
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_storage_root")]
    pub root: String,
    #[serde(default = "default_public_url_prefix")]
    pub public_url_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            public_url_prefix: default_public_url_prefix(),
        }
    }
}

fn default_storage_root() -> String {
    "target/storage".to_string()
}

fn default_public_url_prefix() -> String {
    "/files".to_string()
}

/// Внешний API мониторинга (временные ряды)
#[derive(Debug, Deserialize, Clone)]
pub struct MonitoringConfig {
    #[serde(default = "default_monitoring_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_document_ops_metric")]
    pub document_ops_metric: String,
    #[serde(default = "default_function_executions_metric")]
    pub function_executions_metric: String,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            base_url: default_monitoring_base_url(),
            project_id: None,
            access_token: None,
            document_ops_metric: default_document_ops_metric(),
            function_executions_metric: default_function_executions_metric(),
        }
    }
}

impl MonitoringConfig {
    /// Ходить в мониторинг имеет смысл только с проектом и токеном
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let project = self.project_id.as_deref().filter(|s| !s.trim().is_empty())?;
        let token = self.access_token.as_deref().filter(|s| !s.trim().is_empty())?;
        Some((project, token))
    }
}

fn default_monitoring_base_url() -> String {
    "https://monitoring.googleapis.com/v3".to_string()
}

fn default_document_ops_metric() -> String {
    "firestore.googleapis.com/api/request_count".to_string()
}

fn default_function_executions_metric() -> String {
    "cloudfunctions.googleapis.com/function/execution_count".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MapsConfig {
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AccountingConfig {
    /// Запускать ли автоматический расчёт прошлой недели
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// cron с секундами: "сек мин час день месяц день_недели"
    #[serde(default = "default_schedule_cron")]
    pub schedule_cron: String,
}

impl Default for AccountingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            schedule_cron: default_schedule_cron(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_schedule_cron() -> String {
    "0 0 3 * * Mon".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    #[serde(default)]
    pub currency: Currency,
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            locale: default_locale(),
        }
    }
}

fn default_locale() -> String {
    "ru".to_string()
}

/// Администратор, создаваемый при первом запуске на пустой базе
#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    #[serde(default = "default_admin")]
    pub username: String,
    #[serde(default = "default_admin")]
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: default_admin(),
            password: default_admin(),
            full_name: Some("Administrator".to_string()),
        }
    }
}

fn default_admin() -> String {
    "admin".to_string()
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/app.db"

[server]
port = 3000
static_dir = "dist"

[storage]
root = "target/storage"
public_url_prefix = "/files"

[accounting]
enabled = true
schedule_cron = "0 0 3 * * Mon"

[display]
currency = "rub"
locale = "ru"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// After loading, secrets from the environment override the file:
/// `MAPS_API_KEY`, `MONITORING_ACCESS_TOKEN`.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config = load_config_file()?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

fn load_config_file() -> anyhow::Result<Config> {
    // Try to find config.toml next to the executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    // Fall back to default config
    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Переменные окружения перекрывают секреты из файла
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup("MAPS_API_KEY").filter(|s| !s.trim().is_empty()) {
        config.maps.api_key = Some(key);
    }
    if let Some(token) = lookup("MONITORING_ACCESS_TOKEN").filter(|s| !s.trim().is_empty()) {
        config.monitoring.access_token = Some(token);
    }
}

/// Resolves a configured path.
/// Relative paths are resolved relative to the executable directory.
pub fn resolve_path(path_str: &str) -> PathBuf {
    let path = Path::new(path_str);

    // If absolute path, use as is
    if path.is_absolute() {
        return path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(path);
        }
    }

    // Fallback: use relative to current directory
    PathBuf::from(path_str)
}

/// Get the database file path from configuration
pub fn get_database_path(config: &Config) -> PathBuf {
    resolve_path(&config.database.path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.database.path, "target/db/app.db");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.storage.public_url_prefix, "/files");
        assert_eq!(config.accounting.schedule_cron, "0 0 3 * * Mon");
        assert_eq!(config.display.currency, Currency::Rub);
        assert!(config.maps.api_key.is_none());
        assert!(config.monitoring.credentials().is_none());
    }

    #[test]
    fn test_minimal_config_uses_section_defaults() {
        let config: Config = toml::from_str("[database]\npath = \"x.db\"\n").unwrap();
        assert_eq!(config.server.static_dir, "dist");
        assert_eq!(config.admin.username, "admin");
        assert!(config.accounting.enabled);
        assert_eq!(config.display.locale, "ru");
    }

    #[test]
    fn test_env_overrides() {
        let mut config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        config.monitoring.project_id = Some("demo-project".into());
        apply_env_overrides(&mut config, |key| match key {
            "MAPS_API_KEY" => Some("maps-key".to_string()),
            "MONITORING_ACCESS_TOKEN" => Some("token".to_string()),
            _ => None,
        });
        assert_eq!(config.maps.api_key.as_deref(), Some("maps-key"));
        assert_eq!(config.monitoring.credentials(), Some(("demo-project", "token")));
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let mut config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        config.maps.api_key = Some("from-file".into());
        apply_env_overrides(&mut config, |_| Some("  ".to_string()));
        assert_eq!(config.maps.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_absolute_path_is_kept() {
        let abs = if cfg!(windows) { "C:\\data\\app.db" } else { "/var/lib/app.db" };
        assert_eq!(resolve_path(abs), PathBuf::from(abs));
    }
}
