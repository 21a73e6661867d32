//! Подписка на SSE-поток `/api/live`.
//!
//! Страница подписывается на одну коллекцию и по событию перечитывает данные.
//! Источник закрывается вместе с владельцем (вкладкой).

use contracts::shared::live::{ChangeEvent, LiveCollection, CHANGE_EVENT_NAME};
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{EventSource, MessageEvent};

use crate::shared::api_utils::api_url;
use crate::system::auth::storage;

struct LiveSubscription {
    source: EventSource,
    _listener: Closure<dyn FnMut(MessageEvent)>,
}

fn parse_change(event: &MessageEvent) -> Option<ChangeEvent> {
    let data = event.data().as_string()?;
    match serde_json::from_str::<ChangeEvent>(&data) {
        Ok(change) => Some(change),
        Err(e) => {
            log::warn!("Live: bad event payload: {}", e);
            None
        }
    }
}

fn open(
    collection: LiveCollection,
    on_change: impl Fn(ChangeEvent) + 'static,
) -> Result<LiveSubscription, String> {
    let token = storage::get_access_token().ok_or("not logged in")?;
    let url = api_url(&format!("/api/live?token={}", urlencoding::encode(&token)));
    let source = EventSource::new(&url).map_err(|e| format!("{:?}", e))?;

    let listener = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
        if let Some(change) = parse_change(&event) {
            if change.collection == collection {
                on_change(change);
            }
        }
    });
    source
        .add_event_listener_with_callback(CHANGE_EVENT_NAME, listener.as_ref().unchecked_ref())
        .map_err(|e| format!("{:?}", e))?;

    Ok(LiveSubscription {
        source,
        _listener: listener,
    })
}

/// Подписывает текущего владельца на изменения коллекции.
/// Ошибка подключения не мешает странице: данные просто не обновляются сами.
pub fn use_live_collection(collection: LiveCollection, on_change: impl Fn(ChangeEvent) + 'static) {
    let subscription = match open(collection, on_change) {
        Ok(sub) => sub,
        Err(e) => {
            log::warn!("Live: {} subscription failed: {}", collection.as_str(), e);
            return;
        }
    };
    let stored = StoredValue::new_local(Some(subscription));
    on_cleanup(move || {
        if let Some(sub) = stored.try_update_value(|s| s.take()).flatten() {
            sub.source.close();
        }
    });
}
