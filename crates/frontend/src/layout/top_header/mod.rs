//! Шапка: переключатель навигации, заголовок активного таба, пользователь, выход.

use crate::layout::global_context::AppGlobalContext;
use crate::shared::icons::icon;
use crate::system::auth::context::{do_logout, use_auth};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn TopHeader() -> impl IntoView {
    let ctx = expect_context::<AppGlobalContext>();
    let (auth_state, set_auth_state) = use_auth();

    let active_title = Memo::new(move |_| {
        let active = ctx.active.get()?;
        ctx.opened
            .with(|tabs| tabs.iter().find(|t| t.key == active).map(|t| t.title.clone()))
    });
    let user_name = move || {
        auth_state.with(|s| {
            s.user_info
                .as_ref()
                .map(|u| u.display_name().to_string())
                .unwrap_or_default()
        })
    };

    view! {
        <header class="top-header">
            <div class="top-header__brand">
                <button
                    class="top-header__icon-btn"
                    title="Навигация"
                    on:click=move |_| ctx.toggle_left()
                >
                    {move || icon(if ctx.left_open.get() { "panel-left-close" } else { "panel-left-open" })}
                </button>
                <span class="top-header__title">"Marketplace Admin"</span>
                {move || active_title.get().map(|t| view! {
                    <span class="top-header__crumb">{icon("chevron-right")}{t}</span>
                })}
            </div>

            <div class="top-header__actions">
                <span class="top-header__user">{icon("user")}{user_name}</span>
                <button
                    class="top-header__icon-btn"
                    title="Выход"
                    on:click=move |_| spawn_local(async move { do_logout(set_auth_state).await })
                >
                    {icon("log-out")}
                </button>
            </div>
        </header>
    }
}
