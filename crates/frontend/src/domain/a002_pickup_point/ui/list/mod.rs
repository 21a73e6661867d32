use contracts::domain::a002_pickup_point::aggregate::PickupPoint;
use contracts::shared::live::LiveCollection;
use contracts::shared::search::filter_by_search;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a002_pickup_point::api::{
    delete_pickup_point, fetch_pickup_points, set_pickup_point_active,
};
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::detail_tab_label;
use crate::layout::tabs::tab_labels::{PICKUP_POINT_DETAIL_PREFIX, PICKUP_POINT_NEW};
use crate::shared::components::{ErrorBox, PageHeader, SearchInput};
use crate::shared::icons::icon;
use crate::shared::live::use_live_collection;
use crate::shared::maps::{MapPoint, MapView};
use crate::shared::page_frame::{PageFrame, PAGE_CAT_LIST};

fn to_map_points(points: &[PickupPoint]) -> Vec<MapPoint> {
    points
        .iter()
        .filter(|p| p.has_location())
        .map(|p| MapPoint {
            id: p.to_string_id(),
            title: p.name.clone(),
            lat: p.lat,
            lng: p.lng,
        })
        .collect()
}

#[component]
pub fn PickupPointList() -> impl IntoView {
    let tabs_store = expect_context::<AppGlobalContext>();

    let (items, set_items) = signal(Vec::<PickupPoint>::new());
    let (is_loading, set_is_loading) = signal(false);
    let (error, set_error) = signal(None::<String>);
    let search = RwSignal::new(String::new());

    let load = move || {
        set_is_loading.set(true);
        spawn_local(async move {
            match fetch_pickup_points().await {
                Ok(v) => {
                    set_items.set(v);
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_is_loading.set(false);
        });
    };

    load();
    use_live_collection(LiveCollection::PickupPoint, move |_| load());

    let filtered = Memo::new(move |_| filter_by_search(&items.get(), &search.get()));
    let map_points = Signal::derive(move || to_map_points(&filtered.get()));

    let open_details = move |id: String| {
        let name = items.with_untracked(|list| {
            list.iter()
                .find(|p| p.to_string_id() == id)
                .map(|p| p.name.clone())
        });
        let key = format!("{}{}", PICKUP_POINT_DETAIL_PREFIX, id);
        let title = detail_tab_label("Пункт выдачи", name.as_deref().unwrap_or(&id));
        tabs_store.open_tab(&key, &title);
    };

    let open_new = move |_: leptos::ev::MouseEvent| {
        tabs_store.open_tab(PICKUP_POINT_NEW, "Новый пункт выдачи");
    };

    let toggle_active = move |id: String, is_active: bool| {
        spawn_local(async move {
            match set_pickup_point_active(&id, is_active).await {
                Ok(updated) => set_items.update(|list| {
                    if let Some(slot) = list.iter_mut().find(|p| p.id == updated.id) {
                        *slot = updated;
                    }
                }),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    let remove = move |id: String, name: String| {
        let confirmed = web_sys::window()
            .map(|w| {
                w.confirm_with_message(&format!("Удалить пункт выдачи «{}»?", name))
                    .unwrap_or(false)
            })
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        spawn_local(async move {
            match delete_pickup_point(&id).await {
                Ok(()) => {
                    tabs_store.close_tab(&format!("{}{}", PICKUP_POINT_DETAIL_PREFIX, id));
                    load();
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    view! {
        <PageFrame page_id="a002_pickup_point--list" category=PAGE_CAT_LIST>
            <PageHeader title="Пункты выдачи">
                <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Brand>
                    <span>{move || items.get().len().to_string()}</span>
                </Badge>
                <Button appearance=ButtonAppearance::Primary on_click=open_new>
                    {icon("plus")}
                    " Новый пункт"
                </Button>
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| load()
                    disabled=Signal::derive(move || is_loading.get())
                >
                    {icon("refresh")}
                    {move || if is_loading.get() { " Загрузка..." } else { " Обновить" }}
                </Button>
            </PageHeader>

            <ErrorBox error=error />

            <div class="page__content pickup-layout">
                <div class="pickup-layout__map">
                    <MapView
                        points=map_points
                        on_marker_click=Callback::new(open_details)
                    />
                </div>

                <div class="pickup-layout__table">
                    <SearchInput value=search placeholder="Название, адрес, телефон" />
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell>"Название"</TableHeaderCell>
                                <TableHeaderCell>"Адрес"</TableHeaderCell>
                                <TableHeaderCell>"Телефон"</TableHeaderCell>
                                <TableHeaderCell>"Часы работы"</TableHeaderCell>
                                <TableHeaderCell>"Статус"</TableHeaderCell>
                                <TableHeaderCell>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || filtered.get()
                                key=|p| (p.to_string_id(), p.updated_at)
                                children=move |point| {
                                    let id = point.to_string_id();
                                    let id_open = id.clone();
                                    let id_toggle = id.clone();
                                    let name = point.name.clone();
                                    let is_active = point.is_active;
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <a
                                                    href="#"
                                                    class="table__link"
                                                    on:click=move |ev| {
                                                        ev.prevent_default();
                                                        open_details(id_open.clone());
                                                    }
                                                >
                                                    {point.name.clone()}
                                                </a>
                                            </TableCell>
                                            <TableCell>{point.address.clone()}</TableCell>
                                            <TableCell>{point.contact_phone.clone()}</TableCell>
                                            <TableCell>{point.working_hours.clone().unwrap_or_default()}</TableCell>
                                            <TableCell>
                                                <span
                                                    class="table__toggle"
                                                    title="Переключить активность"
                                                    on:click=move |_| toggle_active(id_toggle.clone(), !is_active)
                                                >
                                                    {if is_active {
                                                        view! {
                                                            <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Success>"Активен"</Badge>
                                                        }.into_any()
                                                    } else {
                                                        view! {
                                                            <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Subtle>"Отключён"</Badge>
                                                        }.into_any()
                                                    }}
                                                </span>
                                            </TableCell>
                                            <TableCell>
                                                <button
                                                    class="button button--ghost"
                                                    title="Удалить"
                                                    on:click=move |_| remove(id.clone(), name.clone())
                                                >
                                                    {icon("delete")}
                                                </button>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                    <Show when=move || filtered.get().is_empty() && !is_loading.get()>
                        <div class="empty-state">"Пунктов выдачи нет"</div>
                    </Show>
                </div>
            </div>
        </PageFrame>
    }
}
