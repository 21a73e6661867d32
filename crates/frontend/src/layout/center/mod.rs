use crate::layout::global_context::{AppGlobalContext, Tab as TabData};
use leptos::ev;
use leptos::prelude::*;

/// Полоса открытых табов
#[component]
fn TabBar() -> impl IntoView {
    let tabs_store = expect_context::<AppGlobalContext>();

    view! {
        <div class="app-tabs__bar">
            <For
                each=move || tabs_store.opened.get()
                key=|tab| tab.key.clone()
                children=move |tab: TabData| view! { <TabHandle tab=tab /> }
            />
        </div>
    }
}

#[component]
fn TabHandle(tab: TabData) -> impl IntoView {
    let tabs_store = expect_context::<AppGlobalContext>();

    let key = StoredValue::new(tab.key.clone());
    let is_active = Memo::new(move |_| {
        tabs_store.active.get().as_deref() == Some(key.get_value().as_str())
    });

    let on_click = move |_| tabs_store.activate_tab(&key.get_value());
    let on_close = move |ev: ev::MouseEvent| {
        ev.stop_propagation();
        tabs_store.close_tab(&key.get_value());
    };

    view! {
        <div class="tab" class:active=is_active on:click=on_click>
            <span>{tab.title}</span>
            <button class="tab-close" on:click=on_close>"×"</button>
        </div>
    }
}

#[component]
pub fn Center(children: Children) -> impl IntoView {
    view! {
        <div data-zone="center" class="app-tabs" style="flex: 1; overflow: auto;">
            <TabBar />
            {children()}
        </div>
    }
}
