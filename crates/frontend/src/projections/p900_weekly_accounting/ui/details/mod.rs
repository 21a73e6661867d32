//! Отчёт за неделю: итоги, отметка о выплате, продажи по продавцам.
//!
//! Продажи грузятся страницами по 20 строк, "Показать ещё" дописывает
//! следующую страницу. Поиск и экспорт работают только по загруженным строкам.

use contracts::projections::p900_weekly_accounting::dto::{
    ReportStatus, SaleSortField, ShopSale, WeeklyReport,
};
use contracts::projections::p900_weekly_accounting::pager::{sales_outdated, SalesPager};
use contracts::shared::format::{
    format_currency, format_datetime, format_number, format_percent, format_week_range, Currency,
};
use contracts::shared::live::LiveCollection;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::projections::p900_weekly_accounting::api::{fetch_report, fetch_sales_page, set_paid};
use crate::shared::components::{ErrorBox, MoneyCell, SearchInput};
use crate::shared::config::use_currency;
use crate::shared::export::{export_to_excel, ExcelExportable};
use crate::shared::icons::icon;
use crate::shared::live::use_live_collection;
use crate::shared::page_frame::{PageFrame, PAGE_CAT_DETAIL};

impl ExcelExportable for ShopSale {
    fn headers() -> Vec<&'static str> {
        vec![
            "Продавец",
            "ID продавца",
            "Выручка",
            "Комиссия",
            "К выплате",
            "Заказы",
            "Количество",
            "Основная категория",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.seller_name.clone(),
            self.seller_id.clone(),
            format!("{:.2}", self.revenue),
            format!("{:.2}", self.commission),
            format!("{:.2}", self.net),
            self.order_count.to_string(),
            self.quantity.to_string(),
            self.top_category().unwrap_or_default().to_string(),
        ]
    }
}

pub fn export_filename(week_id: &str) -> String {
    format!("weekly_report_{}.csv", week_id)
}

#[component]
fn TotalCard(label: &'static str, #[prop(into)] value: Signal<String>) -> impl IntoView {
    view! {
        <Card class="stat-card">
            <div class="stat-card__label">{label}</div>
            <div class="stat-card__value">{move || value.get()}</div>
        </Card>
    }
}

fn report_totals(report: &WeeklyReport, currency: Currency) -> Vec<(&'static str, String)> {
    vec![
        ("Выручка", format_currency(report.total_revenue, currency)),
        ("Комиссия", format_currency(report.total_commission, currency)),
        ("К выплате", format_currency(report.total_net(), currency)),
        ("Доля комиссии", format_percent(report.commission_share())),
        ("Заказы", format_number(report.total_orders)),
        ("Товаров", format_number(report.total_quantity)),
        ("Продавцы", format_number(report.seller_count)),
    ]
}

#[component]
pub fn WeeklyReportDetails(week_id: String) -> impl IntoView {
    let currency = use_currency();
    let week_id = StoredValue::new(week_id);

    let (report, set_report) = signal(None::<WeeklyReport>);
    let (error, set_error) = signal(None::<String>);
    let (paid_busy, set_paid_busy) = signal(false);
    let pager = RwSignal::new(SalesPager::new(SaleSortField::default()));
    let (page_loading, set_page_loading) = signal(false);
    // Ответ для старой сортировки отбрасывается
    let generation = StoredValue::new(0u64);
    let search = RwSignal::new(String::new());
    let sort = RwSignal::new(SaleSortField::default().as_str().to_string());

    let load_more = move || {
        let Some(query) = pager.with_untracked(|p| p.next_query()) else {
            return;
        };
        if page_loading.get_untracked() {
            return;
        }
        let started = generation.get_value();
        set_page_loading.set(true);
        spawn_local(async move {
            let result = fetch_sales_page(&week_id.get_value(), &query).await;
            if generation.try_get_value() != Some(started) {
                return;
            }
            match result {
                Ok(page) => {
                    pager.try_update(|p| p.apply_page(page));
                }
                Err(e) => {
                    set_error.try_set(Some(e));
                }
            }
            set_page_loading.try_set(false);
        });
    };

    // После пересчёта старые строки и курсор недействительны
    let restart_pages = move || {
        generation.update_value(|g| *g += 1);
        set_page_loading.set(false);
        pager.update(|p| p.reset());
        load_more();
    };

    let load_report = move || {
        spawn_local(async move {
            match fetch_report(&week_id.get_value()).await {
                Ok(r) => {
                    let Some(outdated) =
                        report.try_with_untracked(|prev| sales_outdated(prev.as_ref(), &r))
                    else {
                        return;
                    };
                    set_report.try_set(Some(r));
                    if outdated {
                        restart_pages();
                    }
                }
                Err(e) => {
                    set_error.try_set(Some(e));
                }
            }
        });
    };

    load_report();

    use_live_collection(LiveCollection::WeeklyReport, move |change| {
        if change.id == week_id.get_value() {
            load_report();
        }
    });

    // Первая страница и смена сортировки: страницы с начала
    Effect::new(move |_| {
        let Ok(field) = sort.get().parse::<SaleSortField>() else {
            return;
        };
        let changed = pager
            .try_update_untracked(|p| p.set_sort(field))
            .unwrap_or(false);
        if changed {
            generation.update_value(|g| *g += 1);
            set_page_loading.set(false);
            pager.notify();
            load_more();
        }
    });

    let visible = Memo::new(move |_| pager.with(|p| p.visible(&search.get())));

    let toggle_paid = move |_: leptos::ev::MouseEvent| {
        let Some(next) = report.with_untracked(|r| r.as_ref().map(|r| !r.is_paid)) else {
            return;
        };
        set_paid_busy.set(true);
        spawn_local(async move {
            match set_paid(&week_id.get_value(), next).await {
                Ok(updated) => {
                    set_report.try_set(Some(updated));
                }
                Err(e) => {
                    set_error.try_set(Some(e));
                }
            }
            set_paid_busy.try_set(false);
        });
    };

    let export = move |_: leptos::ev::MouseEvent| {
        let rows = visible.get_untracked();
        if let Err(e) = export_to_excel(&rows, &export_filename(&week_id.get_value())) {
            set_error.set(Some(e));
        }
    };

    let title = move || {
        report.with(|r| match r {
            Some(r) => format!("Неделя {}", format_week_range(&r.bounds())),
            None => format!("Неделя {}", week_id.get_value()),
        })
    };

    view! {
        <PageFrame page_id="p900_weekly_accounting--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-text">
                    <h1 class="page__title">{title}</h1>
                    {move || report.get().map(|r| view! {
                        <div class="page__subtitle">
                            {r.status.label()}
                            {r.calculated_at.map(|at| format!(" · рассчитан {}", format_datetime(at.naive_utc())))}
                        </div>
                    })}
                </div>
                <div class="page__actions">
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=export
                        disabled=Signal::derive(move || visible.with(|v| v.is_empty()))
                    >
                        {icon("download")}
                        " Экспорт CSV"
                    </Button>
                    <Show when=move || report.with(|r| r.as_ref().is_some_and(|r| r.status == ReportStatus::Completed))>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=toggle_paid
                            disabled=Signal::derive(move || paid_busy.get())
                        >
                            {icon("check")}
                            {move || if report.with(|r| r.as_ref().is_some_and(|r| r.is_paid)) {
                                " Снять отметку о выплате"
                            } else {
                                " Отметить выплаченным"
                            }}
                        </Button>
                    </Show>
                </div>
            </div>

            <ErrorBox error=error />

            {move || report.get().map(|r| {
                let totals = report_totals(&r, currency.get());
                let paid = if r.is_paid {
                    let by = r.paid_by.clone().unwrap_or_default();
                    let at = r.paid_at.map(|at| format_datetime(at.naive_utc())).unwrap_or_default();
                    format!("Выплачено {} {}", at, by)
                } else {
                    "Не выплачено".to_string()
                };
                view! {
                    <div class="stat-grid">
                        {totals
                            .into_iter()
                            .map(|(label, value)| view! { <TotalCard label=label value=value /> })
                            .collect_view()}
                    </div>
                    <div class="text-muted">{paid}</div>
                    {r.error_message.clone().map(|e| view! { <div class="text-error">{e}</div> })}
                }
            })}

            <div class="page__content">
                <Flex gap=FlexGap::Small align=FlexAlign::End>
                    <div style="min-width: 200px;">
                        <Select value=sort>
                            {SaleSortField::all()
                                .into_iter()
                                .map(|f| view! { <option value=f.as_str()>{format!("По убыванию: {}", f.label())}</option> })
                                .collect_view()}
                        </Select>
                    </div>
                    <SearchInput value=search placeholder="Продавец или ID (по загруженным строкам)" />
                </Flex>

                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell>"Продавец"</TableHeaderCell>
                            <TableHeaderCell>"Выручка"</TableHeaderCell>
                            <TableHeaderCell>"Комиссия"</TableHeaderCell>
                            <TableHeaderCell>"К выплате"</TableHeaderCell>
                            <TableHeaderCell>"Заказы"</TableHeaderCell>
                            <TableHeaderCell>"Кол-во"</TableHeaderCell>
                            <TableHeaderCell>"Категория"</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || visible.get()
                            key=|s| s.seller_id.clone()
                            children=move |sale| {
                                let seller_name = sale.seller_name.clone();
                                let seller_id = sale.seller_id.clone();
                                let order_count = format_number(sale.order_count);
                                let quantity = format_number(sale.quantity);
                                let top_category = sale.top_category().unwrap_or("-").to_string();
                                view! {
                                    <TableRow>
                                        <TableCell>
                                            <div>{seller_name}</div>
                                            <div class="text-muted">{seller_id}</div>
                                        </TableCell>
                                        <MoneyCell value=sale.revenue currency=currency />
                                        <MoneyCell value=sale.commission currency=currency />
                                        <MoneyCell value=sale.net currency=currency />
                                        <TableCell>{order_count}</TableCell>
                                        <TableCell>{quantity}</TableCell>
                                        <TableCell>{top_category}</TableCell>
                                    </TableRow>
                                }
                            }
                        />
                    </TableBody>
                </Table>

                <div class="table__footer">
                    <span class="text-muted">
                        {move || pager.with(|p| format!("Загружено: {}", p.items.len()))}
                    </span>
                    <Show when=move || pager.with(|p| p.can_load_more())>
                        <Button
                            appearance=ButtonAppearance::Secondary
                            on_click=move |_| load_more()
                            disabled=Signal::derive(move || page_loading.get())
                        >
                            {move || if page_loading.get() { "Загрузка..." } else { "Показать ещё" }}
                        </Button>
                    </Show>
                </div>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::export::build_csv;
    use contracts::projections::p900_weekly_accounting::dto::CategoryStat;
    use std::collections::BTreeMap;

    #[test]
    fn test_sale_csv_row() {
        let sale = ShopSale {
            week_id: "2025-01-06".into(),
            seller_id: "s-1".into(),
            seller_name: "Лавка; Ромашка".into(),
            revenue: 1000.0,
            quantity: 3,
            commission: 100.0,
            net: 900.0,
            order_count: 2,
            category_breakdown: BTreeMap::from([(
                "home".to_string(),
                CategoryStat {
                    revenue: 1000.0,
                    quantity: 3,
                },
            )]),
        };
        let csv = build_csv(&[sale]);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "\"Лавка; Ромашка\";s-1;1000.00;100.00;900.00;2;3;home");
        assert_eq!(export_filename("2025-01-06"), "weekly_report_2025-01-06.csv");
    }
}
