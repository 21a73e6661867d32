use axum::extract::{Json, State};
use contracts::system::config::PublicConfig;

use crate::shared::state::AppState;

/// Настройки, которые фронтенд читает до входа
pub async fn public_config(State(state): State<AppState>) -> Json<PublicConfig> {
    Json(PublicConfig {
        maps_api_key: state
            .config
            .maps
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty()),
        currency: state.config.display.currency,
        locale: state.config.display.locale.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::format::Currency;

    #[tokio::test]
    async fn test_public_config_defaults() {
        let (_dir, state) = AppState::for_tests().await;
        let Json(cfg) = public_config(State(state)).await;
        assert!(cfg.maps_api_key.is_none());
        assert_eq!(cfg.currency, Currency::Rub);
        assert_eq!(cfg.locale, "ru");
    }
}
