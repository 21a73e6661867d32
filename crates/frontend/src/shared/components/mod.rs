//! Общие компоненты страниц: заголовок, поиск, блок ошибки, денежная ячейка.

use contracts::shared::format::{format_currency, Currency};
use leptos::prelude::*;
use thaw::*;

use crate::shared::icons::icon;

/// PageHeader component - reusable header for list pages
#[component]
pub fn PageHeader(
    #[prop(into)] title: String,
    #[prop(optional, into)] subtitle: MaybeProp<String>,
    /// Кнопки действий справа
    children: Children,
) -> impl IntoView {
    view! {
        <div class="page__header">
            <div class="page__header-text">
                <h1 class="page__title">{title}</h1>
                {move || subtitle.get().map(|s| view! {
                    <div class="page__subtitle">{s}</div>
                })}
            </div>
            <div class="page__actions">
                {children()}
            </div>
        </div>
    }
}

/// Поле поиска; фильтрация делается вызывающей стороной по уже загруженным данным
#[component]
pub fn SearchInput(
    value: RwSignal<String>,
    #[prop(optional, into)] placeholder: Option<String>,
) -> impl IntoView {
    let placeholder = placeholder.unwrap_or_else(|| "Поиск...".to_string());
    view! {
        <div class="search-input">
            {icon("search")}
            <input
                type="search"
                placeholder=placeholder
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </div>
    }
}

/// Блок с текстом ошибки, пустой если ошибки нет
#[component]
pub fn ErrorBox(#[prop(into)] error: Signal<Option<String>>) -> impl IntoView {
    move || {
        error.get().map(|e| {
            view! {
                <div class="warning-box warning-box--error">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{e}</span>
                </div>
            }
        })
    }
}

/// Ячейка с суммой в валюте отображения
#[component]
pub fn MoneyCell(value: f64, currency: Signal<Currency>) -> impl IntoView {
    view! {
        <TableCell class="text-right">
            {move || format_currency(value, currency.get())}
        </TableCell>
    }
}
