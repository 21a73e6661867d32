//! Корневая обёртка страницы во вкладке.
//!
//! `id` страницы имеет вид `{entity}--{category}`, например `"a002_pickup_point--list"`,
//! по нему из DOM-инспектора легко найти модуль.

use leptos::prelude::*;

/// Список записей с поиском
pub const PAGE_CAT_LIST: &str = "list";
/// Форма одной записи
pub const PAGE_CAT_DETAIL: &str = "detail";
/// Аналитическая панель
pub const PAGE_CAT_DASHBOARD: &str = "dashboard";

#[component]
pub fn PageFrame(
    page_id: &'static str,
    /// Одна из констант PAGE_CAT_*
    category: &'static str,
    #[prop(optional)] class: &'static str,
    children: Children,
) -> impl IntoView {
    let base_class = match category {
        PAGE_CAT_DETAIL => "page page--detail",
        PAGE_CAT_DASHBOARD => "page page--dashboard",
        _ => "page",
    };

    let full_class = if class.is_empty() {
        base_class.to_string()
    } else {
        format!("{base_class} {class}")
    };

    view! {
        <div id=page_id class=full_class data-page-category=category>
            {children()}
        </div>
    }
}
