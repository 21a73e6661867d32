pub mod sidebar;

pub use sidebar::Sidebar;

use crate::layout::global_context::AppGlobalContext;
use leptos::prelude::*;

/// Левая зона; скрывается кнопкой в шапке
#[component]
pub fn Left(children: Children) -> impl IntoView {
    let ctx = expect_context::<AppGlobalContext>();

    view! {
        <aside data-zone="left" class="app-sidebar" class:hidden=move || !ctx.left_open.get()>
            {children()}
        </aside>
    }
}
