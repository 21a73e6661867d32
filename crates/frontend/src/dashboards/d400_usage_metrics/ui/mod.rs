//! Метрики использования хранилища: чтения, записи, вызовы функций.
//!
//! Без учётных данных мониторинга сервер отдаёт синтетические числа,
//! это видно по бейджу источника.

use contracts::dashboards::d400_usage_metrics::{
    MetricsBucket, MetricsRange, MetricsSource, UsageMetricsResponse,
};
use contracts::shared::format::{format_datetime, format_number};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::dashboards::d400_usage_metrics::api::fetch_usage_metrics;
use crate::shared::components::{ErrorBox, PageHeader};
use crate::shared::icons::icon;
use crate::shared::page_frame::{PageFrame, PAGE_CAT_DASHBOARD};

const REFRESH_INTERVAL_MS: u32 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Series {
    Reads,
    Writes,
    Functions,
}

impl Series {
    fn all() -> [Series; 3] {
        [Series::Reads, Series::Writes, Series::Functions]
    }

    fn label(&self) -> &'static str {
        match self {
            Series::Reads => "Чтения",
            Series::Writes => "Записи",
            Series::Functions => "Функции",
        }
    }

    fn class(&self) -> &'static str {
        match self {
            Series::Reads => "metrics-bar--reads",
            Series::Writes => "metrics-bar--writes",
            Series::Functions => "metrics-bar--functions",
        }
    }

    fn value(&self, bucket: &MetricsBucket) -> u64 {
        match self {
            Series::Reads => bucket.reads,
            Series::Writes => bucket.writes,
            Series::Functions => bucket.functions,
        }
    }
}

fn count(value: u64) -> String {
    format_number(i64::try_from(value).unwrap_or(i64::MAX))
}

/// Максимум по всем сериям, общий масштаб для столбиков
fn chart_max(buckets: &[MetricsBucket]) -> u64 {
    buckets
        .iter()
        .flat_map(|b| [b.reads, b.writes, b.functions])
        .max()
        .unwrap_or(0)
}

/// Высота столбика в процентах, ненулевое значение видно всегда
fn bar_height(value: u64, max: u64) -> f64 {
    if max == 0 || value == 0 {
        return 0.0;
    }
    let pct = value as f64 / max as f64 * 100.0;
    pct.clamp(2.0, 100.0)
}

fn source_badge(source: MetricsSource) -> impl IntoView {
    match source {
        MetricsSource::Live => view! {
            <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Success>"Live"</Badge>
        }
        .into_any(),
        MetricsSource::Synthetic => view! {
            <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Warning>"Синтетические данные"</Badge>
        }
        .into_any(),
    }
}

#[component]
fn MetricsChart(data: UsageMetricsResponse) -> impl IntoView {
    let max = chart_max(&data.buckets);
    view! {
        <div class="metrics-chart">
            {data
                .buckets
                .into_iter()
                .map(|bucket| {
                    let title = format!(
                        "{}: чтения {}, записи {}, функции {}",
                        bucket.label,
                        count(bucket.reads),
                        count(bucket.writes),
                        count(bucket.functions)
                    );
                    view! {
                        <div class="metrics-chart__slot" title=title>
                            <div class="metrics-chart__bars">
                                {Series::all()
                                    .into_iter()
                                    .map(|s| {
                                        let style = format!("height: {:.1}%;", bar_height(s.value(&bucket), max));
                                        view! { <div class=format!("metrics-bar {}", s.class()) style=style></div> }
                                    })
                                    .collect_view()}
                            </div>
                            <div class="metrics-chart__label">{bucket.label.clone()}</div>
                        </div>
                    }
                })
                .collect_view()}
        </div>
        <div class="metrics-legend">
            {Series::all()
                .into_iter()
                .map(|s| view! {
                    <span class="metrics-legend__item">
                        <span class=format!("metrics-bar metrics-legend__swatch {}", s.class())></span>
                        {s.label()}
                    </span>
                })
                .collect_view()}
        </div>
    }
}

#[component]
pub fn UsageMetricsDashboard() -> impl IntoView {
    let range = RwSignal::new(MetricsRange::default().as_str().to_string());
    let (data, set_data) = signal(None::<UsageMetricsResponse>);
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal(None::<String>);
    let alive = StoredValue::new(());

    let load = move || {
        let Ok(selected) = range.get_untracked().parse::<MetricsRange>() else {
            return;
        };
        set_loading.set(true);
        spawn_local(async move {
            match fetch_usage_metrics(selected).await {
                Ok(resp) => {
                    set_data.try_set(Some(resp));
                    set_error.try_set(None);
                }
                Err(e) => {
                    set_error.try_set(Some(e));
                }
            }
            set_loading.try_set(false);
        });
    };

    Effect::new(move |_| {
        range.track();
        load();
    });

    // Фоновое обновление, пока вкладка открыта
    spawn_local(async move {
        loop {
            TimeoutFuture::new(REFRESH_INTERVAL_MS).await;
            if alive.try_get_value().is_none() {
                break;
            }
            load();
        }
    });

    view! {
        <PageFrame page_id="d400_usage_metrics--dashboard" category=PAGE_CAT_DASHBOARD>
            <PageHeader title="Метрики использования">
                {move || data.get().map(|d| source_badge(d.source))}
                <div style="min-width: 180px;">
                    <Select value=range>
                        {[MetricsRange::Hour, MetricsRange::Day]
                            .into_iter()
                            .map(|r| view! { <option value=r.as_str()>{r.label()}</option> })
                            .collect_view()}
                    </Select>
                </div>
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_: leptos::ev::MouseEvent| load()
                    disabled=Signal::derive(move || loading.get())
                >
                    {icon("refresh")}
                    {move || if loading.get() { " Загрузка..." } else { " Обновить" }}
                </Button>
            </PageHeader>

            <ErrorBox error=error />

            {move || data.get().map(|d| {
                let totals = d.totals.clone();
                let generated = format_datetime(d.generated_at.naive_utc());
                view! {
                    <div class="stat-grid">
                        <Card class="stat-card">
                            <div class="stat-card__label">"Чтения"</div>
                            <div class="stat-card__value">{count(totals.reads)}</div>
                        </Card>
                        <Card class="stat-card">
                            <div class="stat-card__label">"Записи"</div>
                            <div class="stat-card__value">{count(totals.writes)}</div>
                        </Card>
                        <Card class="stat-card">
                            <div class="stat-card__label">"Вызовы функций"</div>
                            <div class="stat-card__value">{count(totals.functions)}</div>
                        </Card>
                    </div>
                    <div class="page__content">
                        <MetricsChart data=d />
                        <div class="text-muted">{format!("Сформировано {} (UTC)", generated)}</div>
                    </div>
                }
            })}
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn bucket(reads: u64, writes: u64, functions: u64) -> MetricsBucket {
        MetricsBucket {
            label: "10:00".into(),
            start: Utc::now(),
            reads,
            writes,
            functions,
        }
    }

    #[test]
    fn test_chart_max_over_all_series() {
        assert_eq!(chart_max(&[]), 0);
        assert_eq!(chart_max(&[bucket(5, 1, 0), bucket(2, 9, 3)]), 9);
    }

    #[test]
    fn test_bar_height() {
        assert_eq!(bar_height(0, 10), 0.0);
        assert_eq!(bar_height(5, 0), 0.0);
        assert_eq!(bar_height(5, 10), 50.0);
        assert_eq!(bar_height(1, 1000), 2.0);
        assert_eq!(Series::Writes.value(&bucket(1, 2, 3)), 2);
    }
}
