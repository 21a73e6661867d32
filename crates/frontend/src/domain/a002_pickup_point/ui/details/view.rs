use contracts::domain::a002_pickup_point::aggregate::PickupPoint;
use leptos::prelude::*;
use thaw::*;

use super::view_model::{parse_coordinate, picked_location, PickupPointDetailsViewModel, TextField};
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::detail_tab_label;
use crate::layout::tabs::tab_labels::PICKUP_POINT_DETAIL_PREFIX;
use crate::shared::components::ErrorBox;
use crate::shared::icons::icon;
use crate::shared::maps::{MapPoint, MapView};
use crate::shared::page_frame::{PageFrame, PAGE_CAT_DETAIL};

#[component]
fn TextRow(
    vm: PickupPointDetailsViewModel,
    field: TextField,
    label: &'static str,
    #[prop(optional)] placeholder: &'static str,
    #[prop(optional)] multiline: bool,
) -> impl IntoView {
    let value = move || {
        vm.form.with(|f| match field {
            TextField::Name => f.name.clone(),
            TextField::Address => f.address.clone(),
            TextField::ContactPhone => f.contact_phone.clone(),
            TextField::ContactPerson => f.contact_person.clone().unwrap_or_default(),
            TextField::WorkingHours => f.working_hours.clone().unwrap_or_default(),
            TextField::Notes => f.notes.clone().unwrap_or_default(),
        })
    };

    view! {
        <div class="form-group">
            <label>{label}</label>
            {if multiline {
                view! {
                    <textarea
                        rows="3"
                        placeholder=placeholder
                        prop:value=value
                        on:input=move |ev| vm.set_text(field, event_target_value(&ev))
                    />
                }
                .into_any()
            } else {
                view! {
                    <input
                        type="text"
                        placeholder=placeholder
                        prop:value=value
                        on:input=move |ev| vm.set_text(field, event_target_value(&ev))
                    />
                }
                .into_any()
            }}
        </div>
    }
}

/// Форма пункта выдачи. `id=None` открывает создание.
#[component]
pub fn PickupPointDetails(id: Option<String>, on_close: Callback<()>) -> impl IntoView {
    let tabs_store = expect_context::<AppGlobalContext>();
    let vm = PickupPointDetailsViewModel::new();
    let was_new = id.is_none();
    vm.load_if_needed(id);

    let location = Signal::derive(move || vm.form.with(picked_location));
    let marker = Signal::derive(move || {
        vm.form.with(|f| {
            picked_location(f)
                .map(|(lat, lng)| MapPoint {
                    id: f.id.clone().unwrap_or_default(),
                    title: f.name.clone(),
                    lat,
                    lng,
                })
                .into_iter()
                .collect::<Vec<_>>()
        })
    });

    let save = move |_: leptos::ev::MouseEvent| {
        vm.save_command(Callback::new(move |point: PickupPoint| {
            // Новая точка после сохранения переезжает в свой таб
            if was_new {
                let key = format!("{}{}", PICKUP_POINT_DETAIL_PREFIX, point.to_string_id());
                tabs_store.open_tab(&key, &detail_tab_label("Пункт выдачи", &point.name));
                on_close.run(());
            }
        }));
    };

    view! {
        <PageFrame page_id="a002_pickup_point--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-text">
                    <h1 class="page__title">
                        {move || if vm.is_edit_mode() { "Пункт выдачи" } else { "Новый пункт выдачи" }}
                    </h1>
                </div>
                <div class="page__actions">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=save
                        disabled=Signal::derive(move || vm.saving.get() || !vm.is_form_valid())
                    >
                        {icon("save")}
                        {move || if vm.saving.get() { " Сохранение..." } else { " Сохранить" }}
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                        {icon("cancel")}
                        " Закрыть"
                    </Button>
                </div>
            </div>

            <ErrorBox error=vm.error />
            <Show when=move || vm.saved.get()>
                <div class="info-box">{icon("check")}" Сохранено"</div>
            </Show>

            <div class="page__content details-layout">
                <div class="details-form">
                    <TextRow vm=vm field=TextField::Name label="Название" placeholder="ПВЗ на Ленина" />
                    <TextRow vm=vm field=TextField::Address label="Адрес" />
                    <TextRow vm=vm field=TextField::ContactPhone label="Телефон" placeholder="+7 ..." />
                    <TextRow vm=vm field=TextField::ContactPerson label="Контактное лицо" />
                    <TextRow vm=vm field=TextField::WorkingHours label="Часы работы" placeholder="Пн-Пт 10:00-20:00" />

                    <div class="form-row">
                        <div class="form-group">
                            <label>"Широта"</label>
                            <input
                                type="text"
                                prop:value=move || vm.form.with(|f| f.lat.to_string())
                                on:change=move |ev| match parse_coordinate(&event_target_value(&ev)) {
                                    Some(lat) => vm.update(|f| f.lat = lat),
                                    None => vm.error.set(Some("Некорректная широта".to_string())),
                                }
                            />
                        </div>
                        <div class="form-group">
                            <label>"Долгота"</label>
                            <input
                                type="text"
                                prop:value=move || vm.form.with(|f| f.lng.to_string())
                                on:change=move |ev| match parse_coordinate(&event_target_value(&ev)) {
                                    Some(lng) => vm.update(|f| f.lng = lng),
                                    None => vm.error.set(Some("Некорректная долгота".to_string())),
                                }
                            />
                        </div>
                    </div>

                    <div class="form-group form-group--inline">
                        <input
                            type="checkbox"
                            id="pickup-point-active"
                            prop:checked=move || vm.form.with(|f| f.is_active)
                            on:change=move |_| vm.toggle_active_command()
                        />
                        <label for="pickup-point-active">"Активен"</label>
                    </div>

                    <TextRow vm=vm field=TextField::Notes label="Заметки" multiline=true />
                </div>

                <div class="details-map">
                    <div class="text-muted">"Клик по карте задаёт координаты"</div>
                    <MapView
                        points=marker
                        center=location
                        zoom=14
                        on_pick=Callback::new(move |(lat, lng): (f64, f64)| vm.set_location(lat, lng))
                    />
                </div>
            </div>
        </PageFrame>
    }
}
