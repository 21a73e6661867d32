//! Публичная конфигурация сервера: ключ карт, валюта и локаль отображения.

use contracts::shared::format::Currency;
use contracts::system::config::PublicConfig;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::api_utils::{get_json, message};

#[derive(Clone, Copy)]
pub struct PublicConfigContext(pub RwSignal<PublicConfig>);

/// Загружает конфигурацию один раз и кладёт в контекст.
/// До ответа сервера действуют значения по умолчанию.
pub fn provide_public_config() {
    let config = RwSignal::new(PublicConfig::default());
    provide_context(PublicConfigContext(config));

    spawn_local(async move {
        match get_json::<PublicConfig>("/api/system/config/public").await {
            Ok(loaded) => config.set(loaded),
            Err(e) => log::warn!("Public config not loaded: {}", message(e)),
        }
    });
}

pub fn use_public_config() -> RwSignal<PublicConfig> {
    use_context::<PublicConfigContext>()
        .map(|ctx| ctx.0)
        .unwrap_or_else(|| RwSignal::new(PublicConfig::default()))
}

/// Валюта отображения как сигнал
pub fn use_currency() -> Signal<Currency> {
    let config = use_public_config();
    Signal::derive(move || config.with(|c| c.currency))
}
