//! Корень приложения после провайдеров: экран входа или рабочая оболочка.

use crate::layout::global_context::{AppGlobalContext, Tab as TabData};
use crate::layout::tabs::TabPage;
use crate::layout::Shell;
use crate::shared::config::provide_public_config;
use crate::system::auth::context::use_auth;
use crate::system::pages::login::LoginPage;
use leptos::prelude::*;

/// Навигация слева, табы справа. Монтируется только после входа,
/// поэтому публичная конфигурация грузится уже с токеном.
#[component]
fn Workspace() -> impl IntoView {
    let tabs_store = expect_context::<AppGlobalContext>();

    provide_public_config();
    tabs_store.sync_active_with_url();

    view! {
        <Shell>
            <For
                each=move || tabs_store.opened.get()
                key=|tab| tab.key.clone()
                children=move |tab: TabData| view! { <TabPage tab=tab tabs_store=tabs_store /> }
            />
        </Shell>
    }
}

#[component]
pub fn AppShell() -> impl IntoView {
    let (auth_state, _) = use_auth();
    let signed_in = Memo::new(move |_| auth_state.with(|s| s.access_token.is_some()));

    view! {
        <Show when=move || signed_in.get() fallback=|| view! { <LoginPage /> }>
            <Workspace />
        </Show>
    }
}
