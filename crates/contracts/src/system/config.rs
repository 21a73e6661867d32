use serde::{Deserialize, Serialize};

use crate::shared::format::Currency;

/// Публичная часть настроек сервера, доступная фронтенду без авторизации
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicConfig {
    /// Ключ Google Maps; `None`: карта отключена, координаты вводятся вручную
    #[serde(default)]
    pub maps_api_key: Option<String>,
    #[serde(default)]
    pub currency: Currency,
    /// Локаль подписей каталога категорий
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_locale() -> String {
    "ru".to_string()
}

impl Default for PublicConfig {
    fn default() -> Self {
        Self {
            maps_api_key: None,
            currency: Currency::default(),
            locale: default_locale(),
        }
    }
}
