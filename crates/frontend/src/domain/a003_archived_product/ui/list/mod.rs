use contracts::domain::a003_archived_product::aggregate::{ArchivedProduct, ProductCollection};
use contracts::shared::format::{format_datetime, format_number};
use contracts::shared::live::LiveCollection;
use contracts::shared::search::filter_by_search;
use contracts::shared::taxonomy::TaxonomyTree;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::HashSet;
use thaw::*;

use crate::domain::a003_archived_product::api::{fetch_archived, fetch_taxonomy, restore_product};
use crate::shared::api_utils::api_url;
use crate::shared::components::{ErrorBox, MoneyCell, PageHeader, SearchInput};
use crate::shared::config::{use_currency, use_public_config};
use crate::shared::icons::icon;
use crate::shared::live::use_live_collection;
use crate::shared::page_frame::{PageFrame, PAGE_CAT_LIST};

/// "Категория / Подкатегория / ..." с подписями из дерева
fn category_path(product: &ArchivedProduct, tree: Option<&TaxonomyTree>) -> String {
    [
        product.category.as_deref(),
        product.subcategory.as_deref(),
        product.sub_subcategory.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(|key| match tree {
        Some(tree) => tree.label(key).to_string(),
        None => key.to_string(),
    })
    .collect::<Vec<_>>()
    .join(" / ")
}

fn parse_collection(value: &str) -> Option<ProductCollection> {
    value.parse().ok()
}

#[component]
pub fn ArchivedProductList() -> impl IntoView {
    let config = use_public_config();
    let currency = use_currency();

    let (items, set_items) = signal(Vec::<ArchivedProduct>::new());
    let (taxonomy, set_taxonomy) = signal(None::<TaxonomyTree>);
    let (is_loading, set_is_loading) = signal(false);
    let (error, set_error) = signal(None::<String>);
    let restoring = RwSignal::new(HashSet::<String>::new());
    let search = RwSignal::new(String::new());
    // "" = все коллекции
    let collection = RwSignal::new(String::new());

    let load = move || {
        set_is_loading.set(true);
        let filter = parse_collection(&collection.get_untracked());
        spawn_local(async move {
            match fetch_archived(filter).await {
                Ok(v) => {
                    set_items.set(v);
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_is_loading.set(false);
        });
    };

    // Перезагрузка при смене коллекции, в том числе первая
    Effect::new(move |_| {
        collection.track();
        load();
    });

    Effect::new(move |_| {
        let locale = config.with(|c| c.locale.clone());
        spawn_local(async move {
            match fetch_taxonomy(&locale).await {
                Ok(tree) => set_taxonomy.set(Some(tree)),
                Err(e) => log::warn!("Taxonomy not loaded: {}", e),
            }
        });
    });

    use_live_collection(LiveCollection::Product, move |_| load());

    let filtered = Memo::new(move |_| filter_by_search(&items.get(), &search.get()));

    let restore = move |product: ArchivedProduct| {
        // Повторный клик во время запроса игнорируется
        if restoring.with_untracked(|set| set.contains(&product.id)) {
            return;
        }
        restoring.update(|set| {
            set.insert(product.id.clone());
        });
        set_error.set(None);
        spawn_local(async move {
            match restore_product(&product).await {
                Ok(_) => set_items.update(|list| list.retain(|p| p.id != product.id)),
                Err(e) => set_error.set(Some(e)),
            }
            restoring.update(|set| {
                set.remove(&product.id);
            });
        });
    };

    view! {
        <PageFrame page_id="a003_archived_product--list" category=PAGE_CAT_LIST>
            <PageHeader title="Архив товаров">
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
                <Flex gap=FlexGap::Small align=FlexAlign::End>
                    <div style="min-width: 220px;">
                        <Select value=collection>
                            <option value="">"Все коллекции"</option>
                            {ProductCollection::all()
                                .into_iter()
                                .map(|c| view! { <option value=c.as_str()>{c.label()}</option> })
                                .collect_view()}
                        </Select>
                    </div>
                    <SearchInput value=search placeholder="Название, продавец, категория" />
                </Flex>

                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell>""</TableHeaderCell>
                            <TableHeaderCell>"Товар"</TableHeaderCell>
                            <TableHeaderCell>"Категория"</TableHeaderCell>
                            <TableHeaderCell>"Цена"</TableHeaderCell>
                            <TableHeaderCell>"Просмотры / продажи"</TableHeaderCell>
                            <TableHeaderCell>"В архиве"</TableHeaderCell>
                            <TableHeaderCell>"Причина"</TableHeaderCell>
                            <TableHeaderCell>""</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || filtered.get()
                            key=|p| p.id.clone()
                            children=move |product| {
                                let product_id = product.id.clone();
                                let needs_update = product.needs_update;
                                let for_restore = product.clone();
                                let path = {
                                    let product = product.clone();
                                    move || taxonomy.with(|t| category_path(&product, t.as_ref()))
                                };
                                let archived = match (product.archived_at, product.archived_by.clone()) {
                                    (Some(at), Some(by)) => format!("{} ({})", format_datetime(at.naive_utc()), by),
                                    (Some(at), None) => format_datetime(at.naive_utc()),
                                    _ => "-".to_string(),
                                };
                                let thumbnail = product.thumbnail().map(|src| src.to_string());
                                let name = product.name.clone();
                                let collection_label = product.collection.label();
                                let shop_id = product.shop_id.clone();
                                let stats_text = format!(
                                    "{} / {}",
                                    format_number(product.stats.views),
                                    format_number(product.stats.sales)
                                );
                                let archive_reason = product.archive_reason.clone().unwrap_or_default();
                                view! {
                                    <TableRow>
                                        <TableCell>
                                            {thumbnail.map(|src| {
                                                let src = if src.starts_with('/') { api_url(&src) } else { src.to_string() };
                                                view! { <img class="table__thumb" src=src alt="" /> }
                                            })}
                                        </TableCell>
                                        <TableCell>
                                            <div>{name}</div>
                                            <div class="text-muted">
                                                {collection_label}
                                                {shop_id.map(|s| format!(" · {}", s))}
                                            </div>
                                            <Show when=move || needs_update>
                                                <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Warning>"Требует обновления"</Badge>
                                            </Show>
                                        </TableCell>
                                        <TableCell>{path}</TableCell>
                                        <MoneyCell value=product.price currency=currency />
                                        <TableCell>
                                            {stats_text}
                                        </TableCell>
                                        <TableCell>{archived}</TableCell>
                                        <TableCell>{archive_reason}</TableCell>
                                        <TableCell>
                                            <Button
                                                appearance=ButtonAppearance::Primary
                                                size=ButtonSize::Small
                                                on_click=move |_| restore(for_restore.clone())
                                                disabled=Signal::derive({
                                                    let id = product_id.clone();
                                                    move || restoring.with(|set| set.contains(&id))
                                                })
                                            >
                                                {icon("refresh")}
                                                {
                                                    let id = product_id.clone();
                                                    move || if restoring.with(|set| set.contains(&id)) { " Восстановление..." } else { " Восстановить" }
                                                }
                                            </Button>
                                        </TableCell>
                                    </TableRow>
                                }
                            }
                        />
                    </TableBody>
                </Table>
                <Show when=move || filtered.get().is_empty() && !is_loading.get()>
                    <div class="empty-state">"Архивных товаров нет"</div>
                </Show>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn product() -> ArchivedProduct {
        serde_json::from_value(serde_json::json!({
            "id": "p-1",
            "collection": "products",
            "seller_id": "u-1",
            "name": "Кружка",
            "price": 450.0,
            "category": "home",
            "subcategory": "kitchen",
            "is_archived": true,
            "updated_at": "2025-01-06T10:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_category_path_uses_labels_with_fallback() {
        let tree = TaxonomyTree {
            locale: "ru".into(),
            categories: Vec::new(),
            labels: HashMap::from([("home".to_string(), "Дом".to_string())]),
        };
        assert_eq!(category_path(&product(), Some(&tree)), "Дом / kitchen");
        assert_eq!(category_path(&product(), None), "home / kitchen");
    }

    #[test]
    fn test_parse_collection() {
        assert_eq!(parse_collection(""), None);
        assert_eq!(
            parse_collection("shop_products"),
            Some(ProductCollection::ShopProducts)
        );
    }
}
