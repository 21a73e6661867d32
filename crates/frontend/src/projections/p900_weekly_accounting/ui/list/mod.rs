//! Месяц недельных расчётов: недели месяца, статусы отчётов, запуск расчёта.
//!
//! Пока хоть одна неделя в статусе `processing`, список перечитывается
//! каждые 3 секунды. Live-события ускоряют обновление, но не заменяют опрос.

use chrono::{Datelike, Local, NaiveDateTime};
use contracts::projections::p900_weekly_accounting::dto::{
    merge_weeks_with_reports, ReportStatus, WeekRow, WeekRowState, WeeklyReport,
};
use contracts::projections::p900_weekly_accounting::week::weeks_of_month;
use contracts::shared::format::{format_number, format_week_range};
use contracts::shared::live::LiveCollection;
use contracts::usecases::u501_weekly_accounting::{TriggerRequest, TriggerStatus};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::HashSet;
use thaw::*;

use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::detail_tab_label;
use crate::layout::tabs::tab_labels::WEEKLY_REPORT_PREFIX;
use crate::projections::p900_weekly_accounting::api::fetch_reports;
use crate::shared::components::{ErrorBox, MoneyCell, PageHeader};
use crate::shared::config::use_currency;
use crate::shared::icons::icon;
use crate::shared::live::use_live_collection;
use crate::shared::page_frame::{PageFrame, PAGE_CAT_LIST};
use crate::usecases::u501_weekly_accounting::api::trigger;

const POLL_INTERVAL_MS: u32 = 3_000;

const MONTHS: [&str; 12] = [
    "Январь", "Февраль", "Март", "Апрель", "Май", "Июнь", "Июль", "Август", "Сентябрь",
    "Октябрь", "Ноябрь", "Декабрь",
];

pub fn month_title(year: i32, month: u32) -> String {
    let name = MONTHS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("?");
    format!("{} {}", name, year)
}

/// Сдвиг месяца с переходом через год
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

fn has_processing(rows: &[WeekRow], now: NaiveDateTime) -> bool {
    rows.iter()
        .any(|row| row.state(now) == WeekRowState::Processing)
}

/// Запущенный расчёт сразу показывается как `processing`
fn mark_processing(reports: &mut Vec<WeeklyReport>, row: &WeekRow) {
    let week_id = row.bounds.week_id();
    match reports.iter_mut().find(|r| r.week_id == week_id) {
        Some(report) => {
            report.status = ReportStatus::Processing;
            report.error_message = None;
        }
        None => reports.push(WeeklyReport::processing(&row.bounds)),
    }
}

fn state_color(state: WeekRowState) -> BadgeColor {
    match state {
        WeekRowState::Completed => BadgeColor::Success,
        WeekRowState::Processing => BadgeColor::Informative,
        WeekRowState::Failed => BadgeColor::Danger,
        WeekRowState::Incomplete | WeekRowState::NotCalculated => BadgeColor::Subtle,
    }
}

/// Время сотрудника: неделя закрывается по его воскресенью 23:59:59
fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[component]
pub fn WeeklyAccountingList() -> impl IntoView {
    let tabs_store = expect_context::<AppGlobalContext>();
    let currency = use_currency();

    let today = local_now().date();
    let year = RwSignal::new(today.year());
    let month = RwSignal::new(today.month());
    let now = RwSignal::new(local_now());

    let (reports, set_reports) = signal(Vec::<WeeklyReport>::new());
    let (is_loading, set_is_loading) = signal(false);
    let (error, set_error) = signal(None::<String>);
    let (notice, set_notice) = signal(None::<String>);
    let triggering = RwSignal::new(HashSet::<String>::new());
    let polling = StoredValue::new(false);

    let rows = Memo::new(move |_| {
        let weeks = weeks_of_month(year.get(), month.get());
        merge_weeks_with_reports(&weeks, reports.get())
    });

    let load = move || {
        let (Some(y), Some(m)) = (year.try_get_untracked(), month.try_get_untracked()) else {
            return;
        };
        set_is_loading.set(true);
        spawn_local(async move {
            match fetch_reports(y, m).await {
                Ok(v) => {
                    set_reports.try_set(v);
                    set_error.try_set(None);
                }
                Err(e) => {
                    set_error.try_set(Some(e));
                }
            }
            now.try_set(local_now());
            set_is_loading.try_set(false);
        });
    };

    Effect::new(move |_| {
        year.track();
        month.track();
        load();
    });

    use_live_collection(LiveCollection::WeeklyReport, move |_| load());

    // Опрос, пока есть недели в расчёте; вкладка закрыта - цикл выходит
    let start_polling = move || {
        if polling.try_get_value() != Some(false) {
            return;
        }
        polling.set_value(true);
        spawn_local(async move {
            loop {
                TimeoutFuture::new(POLL_INTERVAL_MS).await;
                if polling.try_get_value() != Some(true) {
                    break;
                }
                load();
                let still_processing = rows
                    .try_with_untracked(|rows| has_processing(rows, local_now()))
                    .unwrap_or(false);
                if !still_processing {
                    polling.try_set_value(false);
                    break;
                }
            }
        });
    };

    Effect::new(move |_| {
        if rows.with(|rows| has_processing(rows, now.get())) {
            start_polling();
        }
    });

    let run_trigger = move |row: WeekRow, force: bool| {
        let week_id = row.bounds.week_id();
        if triggering.with_untracked(|set| set.contains(&week_id)) {
            return;
        }
        triggering.update(|set| {
            set.insert(week_id.clone());
        });
        set_error.set(None);
        set_notice.set(None);
        spawn_local(async move {
            match trigger(TriggerRequest::for_week(week_id.clone(), force)).await {
                Ok(response) => match response.status {
                    TriggerStatus::Started => {
                        set_reports.try_update(|reports| mark_processing(reports, &row));
                    }
                    TriggerStatus::AlreadyCalculated => {
                        set_notice.try_set(Some(format!(
                            "Отчёт за {} уже рассчитан",
                            format_week_range(&row.bounds)
                        )));
                    }
                },
                Err(e) => {
                    set_error.try_set(Some(e));
                }
            }
            triggering.try_update(|set| {
                set.remove(&week_id);
            });
        });
    };

    let open_report = move |row: &WeekRow| {
        let key = format!("{}{}", WEEKLY_REPORT_PREFIX, row.bounds.week_id());
        let title = detail_tab_label("Неделя", &format_week_range(&row.bounds));
        tabs_store.open_tab(&key, &title);
    };

    let go_month = move |delta: i32| {
        let (y, m) = shift_month(year.get_untracked(), month.get_untracked(), delta);
        year.set(y);
        month.set(m);
    };

    view! {
        <PageFrame page_id="p900_weekly_accounting--list" category=PAGE_CAT_LIST>
            <PageHeader title="Недельные расчёты">
                <Button appearance=ButtonAppearance::Subtle on_click=move |_| go_month(-1)>"‹"</Button>
                <span class="month-title">{move || month_title(year.get(), month.get())}</span>
                <Button appearance=ButtonAppearance::Subtle on_click=move |_| go_month(1)>"›"</Button>
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
            {move || notice.get().map(|n| view! { <div class="info-box">{n}</div> })}

            <div class="page__content">
                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell>"Неделя"</TableHeaderCell>
                            <TableHeaderCell>"Статус"</TableHeaderCell>
                            <TableHeaderCell>"Выручка"</TableHeaderCell>
                            <TableHeaderCell>"Комиссия"</TableHeaderCell>
                            <TableHeaderCell>"Заказы"</TableHeaderCell>
                            <TableHeaderCell>"Продавцы"</TableHeaderCell>
                            <TableHeaderCell>"Выплата"</TableHeaderCell>
                            <TableHeaderCell>""</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || rows.get()
                            key=|row| (row.bounds.week_id(), row.report.clone().map(|r| (r.status, r.is_paid, r.calculated_at)))
                            children=move |row| {
                                let state = row.state(now.get_untracked());
                                let can_trigger = row.can_trigger(now.get_untracked());
                                let week_id = row.bounds.week_id();
                                let report = row.report.clone();
                                let row_for_open = row.clone();
                                let row_for_trigger = row.clone();
                                let force = matches!(state, WeekRowState::Completed | WeekRowState::Failed);
                                let week_id_label = week_id.clone();
                                let error_message = report.as_ref().and_then(|r| r.error_message.clone());
                                let total_revenue = report.as_ref().map(|r| r.total_revenue).unwrap_or(0.0);
                                let total_commission = report.as_ref().map(|r| r.total_commission).unwrap_or(0.0);
                                let total_orders = format_number(report.as_ref().map(|r| r.total_orders).unwrap_or(0));
                                let seller_count = format_number(report.as_ref().map(|r| r.seller_count).unwrap_or(0));
                                view! {
                                    <TableRow>
                                        <TableCell>
                                            <div>{format_week_range(&row.bounds)}</div>
                                            <div class="text-muted">{week_id_label}</div>
                                        </TableCell>
                                        <TableCell>
                                            <Badge appearance=BadgeAppearance::Tint color=state_color(state)>
                                                {state.label()}
                                            </Badge>
                                            {error_message.map(|e| view! {
                                                <div class="text-error">{e}</div>
                                            })}
                                        </TableCell>
                                        <MoneyCell value=total_revenue currency=currency />
                                        <MoneyCell value=total_commission currency=currency />
                                        <TableCell>{total_orders}</TableCell>
                                        <TableCell>{seller_count}</TableCell>
                                        <TableCell>
                                            {match report.as_ref() {
                                                Some(r) if r.is_paid => view! {
                                                    <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Success>"Выплачено"</Badge>
                                                }.into_any(),
                                                Some(r) if r.status == ReportStatus::Completed => view! {
                                                    <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Warning>"Не выплачено"</Badge>
                                                }.into_any(),
                                                _ => view! { <span class="text-muted">"-"</span> }.into_any(),
                                            }}
                                        </TableCell>
                                        <TableCell>
                                            <Flex gap=FlexGap::Small>
                                                <Show when=move || state == WeekRowState::Completed>
                                                    <Button
                                                        appearance=ButtonAppearance::Secondary
                                                        size=ButtonSize::Small
                                                        on_click={
                                                            let row = row_for_open.clone();
                                                            move |_| open_report(&row)
                                                        }
                                                    >
                                                        "Открыть"
                                                    </Button>
                                                </Show>
                                                <Show when=move || can_trigger>
                                                    <Button
                                                        appearance=ButtonAppearance::Primary
                                                        size=ButtonSize::Small
                                                        on_click={
                                                            let row = row_for_trigger.clone();
                                                            move |_| run_trigger(row.clone(), force)
                                                        }
                                                        disabled=Signal::derive({
                                                            let week_id = week_id.clone();
                                                            move || triggering.with(|set| set.contains(&week_id))
                                                        })
                                                    >
                                                        {icon("calendar")}
                                                        {if force { " Пересчитать" } else { " Рассчитать" }}
                                                    </Button>
                                                </Show>
                                            </Flex>
                                        </TableCell>
                                    </TableRow>
                                }
                            }
                        />
                    </TableBody>
                </Table>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::projections::p900_weekly_accounting::week::WeekBounds;

    fn monday(y: i32, m: u32, d: u32) -> WeekBounds {
        WeekBounds::containing(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_shift_month_crosses_year() {
        assert_eq!(shift_month(2025, 1, -1), (2024, 12));
        assert_eq!(shift_month(2024, 12, 1), (2025, 1));
        assert_eq!(shift_month(2025, 6, 0), (2025, 6));
        assert_eq!(month_title(2025, 3), "Март 2025");
    }

    #[test]
    fn test_mark_processing_inserts_or_updates() {
        let row = WeekRow {
            bounds: monday(2025, 1, 6),
            report: None,
        };
        let mut reports = Vec::new();
        mark_processing(&mut reports, &row);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].week_id, "2025-01-06");
        assert_eq!(reports[0].status, ReportStatus::Processing);

        reports[0].status = ReportStatus::Failed;
        reports[0].error_message = Some("boom".into());
        mark_processing(&mut reports, &row);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].status, ReportStatus::Processing);
        assert!(reports[0].error_message.is_none());
    }

    #[test]
    fn test_has_processing() {
        let bounds = monday(2025, 1, 6);
        let now = NaiveDate::from_ymd_opt(2025, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let idle = vec![WeekRow { bounds, report: None }];
        assert!(!has_processing(&idle, now));
        let busy = vec![WeekRow {
            bounds,
            report: Some(WeeklyReport::processing(&bounds)),
        }];
        assert!(has_processing(&busy, now));
    }

    #[test]
    fn test_local_now_uses_local_offset() {
        let offset = i64::from(Local::now().offset().local_minus_utc());
        let shift = (local_now() - chrono::Utc::now().naive_utc()).num_seconds();
        assert!((shift - offset).abs() <= 2, "shift {} offset {}", shift, offset);
    }
}
