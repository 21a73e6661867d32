use contracts::domain::a001_banner::aggregate::{Banner, BannerKind, BannerLink, BannerLinkType};
use contracts::shared::format::format_datetime;
use contracts::shared::live::LiveCollection;
use contracts::shared::search::filter_by_search;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;
use web_sys::{File, FileList, HtmlInputElement};

use crate::domain::a001_banner::api::{delete_banner, fetch_banners, set_banner_link, upload_banner};
use crate::shared::api_utils::api_url;
use crate::shared::components::{ErrorBox, PageHeader, SearchInput};
use crate::shared::icons::icon;
use crate::shared::live::use_live_collection;
use crate::shared::page_frame::{PageFrame, PAGE_CAT_LIST};

/// Совпадает с лимитом сервера
const MAX_FILE_SIZE: f64 = 5.0 * 1024.0 * 1024.0;

fn files_from_list(list: Option<FileList>) -> Vec<File> {
    match list {
        Some(list) => (0..list.length()).filter_map(|i| list.get(i)).collect(),
        None => Vec::new(),
    }
}

fn check_file(file: &File) -> Result<(), String> {
    if !file.type_().starts_with("image/") {
        return Err(format!("{}: это не изображение", file.name()));
    }
    if file.size() > MAX_FILE_SIZE {
        return Err(format!("{}: файл больше 5 МБ", file.name()));
    }
    Ok(())
}

fn link_type_label(link_type: BannerLinkType) -> &'static str {
    match link_type {
        BannerLinkType::Product => "Товар",
        BannerLinkType::Shop => "Магазин",
        BannerLinkType::Category => "Категория",
        BannerLinkType::Url => "Внешняя ссылка",
    }
}

/// Относительные пути отдаёт backend
fn image_src(url: &str) -> String {
    if url.starts_with('/') {
        api_url(url)
    } else {
        url.to_string()
    }
}

/// Карточка перерисовывается при смене ссылки
fn card_key(banner: &Banner) -> String {
    match &banner.link {
        Some(link) => format!(
            "{}|{}:{}",
            banner.to_string_id(),
            link.link_type.as_str(),
            link.link_id
        ),
        None => banner.to_string_id(),
    }
}

/// Баннеры одного вида: загрузка, ссылки, удаление
#[component]
pub fn BannerList(kind: BannerKind) -> impl IntoView {
    let (items, set_items) = signal(Vec::<Banner>::new());
    let (is_loading, set_is_loading) = signal(false);
    let (error, set_error) = signal(None::<String>);
    let (uploading, set_uploading) = signal(false);
    let (drag_over, set_drag_over) = signal(false);
    let search = RwSignal::new(String::new());

    let load = move || {
        set_is_loading.set(true);
        spawn_local(async move {
            match fetch_banners(kind).await {
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
    use_live_collection(LiveCollection::Banner, move |_| load());

    let upload = move |files: Vec<File>| {
        if files.is_empty() {
            return;
        }
        set_uploading.set(true);
        set_error.set(None);
        spawn_local(async move {
            let mut failures = Vec::new();
            for file in files {
                if let Err(e) = check_file(&file) {
                    failures.push(e);
                    continue;
                }
                if let Err(e) = upload_banner(kind, &file, None).await {
                    failures.push(format!("{}: {}", file.name(), e));
                }
            }
            if !failures.is_empty() {
                set_error.set(Some(failures.join("; ")));
            }
            set_uploading.set(false);
            load();
        });
    };

    let filtered = Memo::new(move |_| filter_by_search(&items.get(), &search.get()));
    let on_changed = Callback::new(move |_: ()| load());

    let page_id = match kind {
        BannerKind::Market => "a001_banner_market--list",
        BannerKind::TopAd => "a001_banner_top_ad--list",
    };

    view! {
        <PageFrame page_id=page_id category=PAGE_CAT_LIST>
            <PageHeader title=kind.label()>
                <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Brand>
                    <span>{move || items.get().len().to_string()}</span>
                </Badge>
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

            <div class="page__content">
                <label
                    class=move || if drag_over.get() { "upload-zone upload-zone--active" } else { "upload-zone" }
                    on:dragover=move |ev: web_sys::DragEvent| {
                        ev.prevent_default();
                        set_drag_over.set(true);
                    }
                    on:dragleave=move |_| set_drag_over.set(false)
                    on:drop=move |ev: web_sys::DragEvent| {
                        ev.prevent_default();
                        set_drag_over.set(false);
                        upload(files_from_list(ev.data_transfer().and_then(|dt| dt.files())));
                    }
                >
                    {icon("upload")}
                    <span>
                        {move || if uploading.get() {
                            "Загрузка..."
                        } else {
                            "Перетащите изображения сюда или нажмите для выбора (до 5 МБ)"
                        }}
                    </span>
                    <input
                        type="file"
                        accept="image/*"
                        multiple
                        class="upload-zone__input"
                        disabled=move || uploading.get()
                        on:change=move |ev| {
                            let input: HtmlInputElement = event_target(&ev);
                            upload(files_from_list(input.files()));
                            input.set_value("");
                        }
                    />
                </label>

                <SearchInput value=search placeholder="Поиск по ссылке или файлу" />

                <Show
                    when=move || !filtered.get().is_empty()
                    fallback=move || view! {
                        <div class="empty-state">
                            {move || if is_loading.get() { "Загрузка..." } else { "Баннеров нет" }}
                        </div>
                    }
                >
                    <div class="banner-grid">
                        <For
                            each=move || filtered.get()
                            key=card_key
                            children=move |banner| view! { <BannerCard banner=banner on_changed=on_changed /> }
                        />
                    </div>
                </Show>
            </div>
        </PageFrame>
    }
}

#[component]
fn BannerCard(banner: Banner, on_changed: Callback<()>) -> impl IntoView {
    let id = StoredValue::new(banner.to_string_id());
    let current = banner.link.clone();

    let editing = RwSignal::new(false);
    let busy = RwSignal::new(false);
    let (error, set_error) = signal(None::<String>);
    let link_type = RwSignal::new(
        current
            .as_ref()
            .map(|l| l.link_type.as_str().to_string())
            .unwrap_or_else(|| BannerLinkType::Product.as_str().to_string()),
    );
    let link_id = RwSignal::new(current.as_ref().map(|l| l.link_id.clone()).unwrap_or_default());
    let link_name = RwSignal::new(
        current
            .as_ref()
            .and_then(|l| l.link_name.clone())
            .unwrap_or_default(),
    );

    let submit_link = move |link: Option<BannerLink>| {
        busy.set(true);
        set_error.set(None);
        spawn_local(async move {
            match set_banner_link(&id.get_value(), link).await {
                Ok(_) => {
                    editing.set(false);
                    on_changed.run(());
                }
                Err(e) => set_error.set(Some(e)),
            }
            busy.set(false);
        });
    };

    let save_link = move |_: leptos::ev::MouseEvent| {
        let parsed = link_type.get_untracked().parse::<BannerLinkType>();
        let link = match parsed {
            Ok(link_type) => BannerLink {
                link_type,
                link_id: link_id.get_untracked().trim().to_string(),
                link_name: Some(link_name.get_untracked().trim().to_string())
                    .filter(|s| !s.is_empty()),
            },
            Err(e) => {
                set_error.set(Some(e));
                return;
            }
        };
        if let Err(e) = link.validate() {
            set_error.set(Some(e));
            return;
        }
        submit_link(Some(link));
    };

    let remove = move |_: leptos::ev::MouseEvent| {
        let confirmed = web_sys::window()
            .map(|w| w.confirm_with_message("Удалить баннер?").unwrap_or(false))
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        busy.set(true);
        spawn_local(async move {
            match delete_banner(&id.get_value()).await {
                Ok(()) => on_changed.run(()),
                Err(e) => {
                    set_error.set(Some(e));
                    busy.set(false);
                }
            }
        });
    };

    let link_text = current.as_ref().map(|l| {
        format!(
            "{}: {}",
            link_type_label(l.link_type),
            l.link_name.clone().unwrap_or_else(|| l.link_id.clone())
        )
    });
    let has_link = current.is_some();
    let swatch = banner
        .dominant_color
        .clone()
        .map(|c| format!("background: {};", c));

    view! {
        <Card class="banner-card">
            <img class="banner-card__image" src=image_src(&banner.image_url) alt=banner.storage_path.clone() />
            <div class="banner-card__meta">
                {swatch.map(|style| view! { <span class="banner-card__swatch" style=style></span> })}
                <span class="text-muted">{format_datetime(banner.created_at.naive_utc())}</span>
            </div>
            <div class="banner-card__link">
                {icon("link")}
                <span>{link_text.unwrap_or_else(|| "Без ссылки".to_string())}</span>
            </div>

            <Show when=move || editing.get()>
                <Flex vertical=true gap=FlexGap::Small>
                    <Select value=link_type>
                        {BannerLinkType::all()
                            .into_iter()
                            .map(|t| view! { <option value=t.as_str()>{link_type_label(t)}</option> })
                            .collect_view()}
                    </Select>
                    <Input value=link_id placeholder="ID объекта или URL" />
                    <Input value=link_name placeholder="Название (необязательно)" />
                    <Flex gap=FlexGap::Small>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=save_link
                            disabled=Signal::derive(move || busy.get())
                        >
                            {icon("save")}
                            " Сохранить"
                        </Button>
                        <Button appearance=ButtonAppearance::Secondary on_click=move |_| editing.set(false)>
                            {icon("cancel")}
                            " Отмена"
                        </Button>
                    </Flex>
                </Flex>
            </Show>

            <ErrorBox error=error />

            <Flex gap=FlexGap::Small justify=FlexJustify::End>
                <Show when=move || !editing.get()>
                    <Button appearance=ButtonAppearance::Subtle on_click=move |_| editing.set(true)>
                        {icon("link")}
                        " Ссылка"
                    </Button>
                </Show>
                <Show when=move || has_link && !editing.get()>
                    <Button
                        appearance=ButtonAppearance::Subtle
                        on_click=move |_| submit_link(None)
                        disabled=Signal::derive(move || busy.get())
                    >
                        {icon("x")}
                        " Убрать ссылку"
                    </Button>
                </Show>
                <Button
                    appearance=ButtonAppearance::Subtle
                    on_click=remove
                    disabled=Signal::derive(move || busy.get())
                >
                    {icon("delete")}
                    " Удалить"
                </Button>
            </Flex>
        </Card>
    }
}
