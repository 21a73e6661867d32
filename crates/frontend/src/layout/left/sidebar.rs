//! Sidebar component with collapsible menu groups

use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_label_for_key;
use crate::shared::icons::icon;
use leptos::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct MenuGroup {
    id: &'static str,
    label: &'static str,
    icon: &'static str,
    items: Vec<(&'static str, &'static str, &'static str)>, // (id, label, icon)
}

fn get_menu_groups() -> Vec<MenuGroup> {
    vec![
        MenuGroup {
            id: "content",
            label: "Витрина",
            icon: "image",
            items: vec![
                ("a001_banner_market", tab_label_for_key("a001_banner_market"), "image"),
                ("a001_banner_top_ad", tab_label_for_key("a001_banner_top_ad"), "image"),
                ("a003_archived_product", tab_label_for_key("a003_archived_product"), "archive"),
            ],
        },
        MenuGroup {
            id: "logistics",
            label: "Логистика",
            icon: "map-pin",
            items: vec![("a002_pickup_point", tab_label_for_key("a002_pickup_point"), "map-pin")],
        },
        MenuGroup {
            id: "finance",
            label: "Финансы",
            icon: "calendar",
            items: vec![(
                "p900_weekly_accounting",
                tab_label_for_key("p900_weekly_accounting"),
                "calendar",
            )],
        },
        MenuGroup {
            id: "dashboards",
            label: "Дашборды",
            icon: "bar-chart",
            items: vec![(
                "d400_usage_metrics",
                tab_label_for_key("d400_usage_metrics"),
                "bar-chart",
            )],
        },
    ]
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = expect_context::<AppGlobalContext>();

    let expanded_groups = RwSignal::new(
        get_menu_groups()
            .iter()
            .map(|g| g.id.to_string())
            .collect::<Vec<_>>(),
    );

    view! {
        <div class="app-sidebar__content">
            {get_menu_groups().into_iter().map(|group| {
                let group_id = group.id.to_string();
                let gid_click = group_id.clone();
                let gid_chevron = group_id.clone();
                let gid_show = group_id.clone();
                let items = StoredValue::new(group.items.clone());

                view! {
                    <div>
                        <div
                            class="app-sidebar__item"
                            style:padding-left="12px"
                            on:click=move |_| {
                                let gid = gid_click.clone();
                                expanded_groups.update(move |groups| {
                                    if let Some(pos) = groups.iter().position(|x| x == &gid) {
                                        groups.remove(pos);
                                    } else {
                                        groups.push(gid);
                                    }
                                });
                            }
                        >
                            <div class="app-sidebar__item-content">
                                {icon(group.icon)}
                                <span>{group.label}</span>
                            </div>
                            <div
                                class="app-sidebar__chevron"
                                class:app-sidebar__chevron--expanded=move || expanded_groups.get().contains(&gid_chevron)
                            >
                                {icon("chevron-right")}
                            </div>
                        </div>

                        <Show when=move || expanded_groups.get().contains(&gid_show)>
                            <div class="app-sidebar__children">
                                {items.get_value().into_iter().map(|(id, label, icon_name)| {
                                    view! {
                                        <div
                                            class="app-sidebar__item"
                                            class:app-sidebar__item--active=move || {
                                                ctx.active.get().as_deref() == Some(id)
                                            }
                                            style:padding-left="10px"
                                            on:click=move |_| ctx.open_tab(id, label)
                                        >
                                            <div class="app-sidebar__item-content">
                                                {icon(icon_name)}
                                                <span>{label}</span>
                                            </div>
                                        </div>
                                    }
                                }).collect_view()}
                            </div>
                        </Show>
                    </div>
                }
            }).collect_view()}
        </div>
    }
}
