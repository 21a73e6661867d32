pub mod center;
pub mod global_context;
pub mod left;
pub mod tabs;
pub mod top_header;

use leptos::prelude::*;

use center::Center;
use left::{Left, Sidebar};
use top_header::TopHeader;

/// Рабочая область: шапка, навигация слева, табы справа.
/// `children` рисует содержимое табов под полосой табов.
#[component]
pub fn Shell(children: Children) -> impl IntoView {
    view! {
        <div class="app-layout">
            <TopHeader />
            <div class="app-body">
                <Left>
                    <Sidebar />
                </Left>
                <main class="app-main">
                    <Center>{children()}</Center>
                </main>
            </div>
        </div>
    }
}
