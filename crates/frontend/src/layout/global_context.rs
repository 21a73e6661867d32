//! Глобальное состояние оболочки: открытые табы, активный таб, видимость навигации.
//!
//! Активный таб отражается в адресе как `?active=<key>`, после перезагрузки
//! страницы он открывается снова.

use leptos::prelude::*;
use std::collections::HashMap;
use web_sys::window;

use crate::layout::tabs::tab_labels::restored_tab_title;

const ACTIVE_PARAM: &str = "active";

/// Таб, открываемый после входа, если в адресе ничего нет
pub const HOME_TAB: &str = "p900_weekly_accounting";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub key: String,
    pub title: String,
}

/// Добавляет таб, если его ещё нет. true, если список изменился.
fn push_unique(tabs: &mut Vec<Tab>, key: &str, title: &str) -> bool {
    if tabs.iter().any(|t| t.key == key) {
        return false;
    }
    tabs.push(Tab {
        key: key.to_string(),
        title: title.to_string(),
    });
    true
}

/// Какой таб станет активным после закрытия `closed`.
///
/// Если закрыт не активный, активный не меняется. Иначе активным
/// становится сосед слева, а для первого таба сосед справа.
fn active_after_close(tabs: &[Tab], closed: &str, active: Option<&str>) -> Option<String> {
    if active != Some(closed) {
        return active.map(str::to_string);
    }
    let pos = tabs.iter().position(|t| t.key == closed)?;
    let rest: Vec<&Tab> = tabs.iter().filter(|t| t.key != closed).collect();
    if rest.is_empty() {
        return None;
    }
    let idx = pos.saturating_sub(1).min(rest.len() - 1);
    Some(rest[idx].key.clone())
}

fn active_from_query(search: &str) -> Option<String> {
    let params: HashMap<String, String> =
        serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default();
    params
        .get(ACTIVE_PARAM)
        .filter(|k| !k.trim().is_empty())
        .cloned()
}

fn query_for_active(key: &str) -> String {
    let params = HashMap::from([(ACTIVE_PARAM.to_string(), key.to_string())]);
    format!("?{}", serde_qs::to_string(&params).unwrap_or_default())
}

fn current_search() -> String {
    window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub opened: RwSignal<Vec<Tab>>,
    pub active: RwSignal<Option<String>>,
    pub left_open: RwSignal<bool>,
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            opened: RwSignal::new(vec![]),
            active: RwSignal::new(None),
            left_open: RwSignal::new(true),
        }
    }

    /// Открывает таб из адреса (или домашний) и дальше пишет активный таб в адрес
    pub fn sync_active_with_url(&self) {
        let key = active_from_query(&current_search()).unwrap_or_else(|| HOME_TAB.to_string());
        self.open_tab(&key, &restored_tab_title(&key));

        let this = *self;
        Effect::new(move |_| {
            let Some(key) = this.active.get() else {
                return;
            };
            let next = query_for_active(&key);
            if current_search() == next {
                return;
            }
            let replaced = window()
                .and_then(|w| w.history().ok())
                .map(|h| h.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&next)));
            if let Some(Err(e)) = replaced {
                log::warn!("history.replaceState failed: {:?}", e);
            }
        });
    }

    pub fn open_tab(&self, key: &str, title: &str) {
        self.opened.update(|tabs| {
            push_unique(tabs, key, title);
        });
        self.activate_tab(key);
    }

    pub fn activate_tab(&self, key: &str) {
        self.active.set(Some(key.to_string()));
    }

    pub fn close_tab(&self, key: &str) {
        log::debug!("close_tab: {}", key);
        let next = self.opened.with_untracked(|tabs| {
            self.active
                .with_untracked(|active| active_after_close(tabs, key, active.as_deref()))
        });
        self.opened.update(|tabs| tabs.retain(|t| t.key != key));
        self.active.set(next);
    }

    pub fn toggle_left(&self) {
        self.left_open.update(|val| *val = !*val);
    }
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tabs(keys: &[&str]) -> Vec<Tab> {
        keys.iter()
            .map(|k| Tab {
                key: k.to_string(),
                title: k.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_push_unique() {
        let mut list = tabs(&["a"]);
        assert!(!push_unique(&mut list, "a", "A"));
        assert!(push_unique(&mut list, "b", "B"));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_active_after_close() {
        let list = tabs(&["a", "b", "c"]);
        assert_eq!(active_after_close(&list, "b", Some("b")), Some("a".into()));
        assert_eq!(active_after_close(&list, "a", Some("a")), Some("b".into()));
        assert_eq!(active_after_close(&list, "c", Some("a")), Some("a".into()));
        assert_eq!(active_after_close(&tabs(&["a"]), "a", Some("a")), None);
    }

    #[test]
    fn test_active_query() {
        assert_eq!(
            active_from_query("?active=a002_pickup_point"),
            Some("a002_pickup_point".into())
        );
        assert_eq!(active_from_query(""), None);
        assert_eq!(active_from_query("?active="), None);
        assert_eq!(
            active_from_query(&query_for_active("p900_weekly_report_2025-01-06")),
            Some("p900_weekly_report_2025-01-06".into())
        );
    }
}
