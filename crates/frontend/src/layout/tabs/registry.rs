//! Tab content registry - единственный источник правды для маппинга tab.key → View

use super::tab_labels::{PICKUP_POINT_DETAIL_PREFIX, PICKUP_POINT_NEW, WEEKLY_REPORT_PREFIX};
use crate::dashboards::d400_usage_metrics::ui::UsageMetricsDashboard;
use crate::domain::a001_banner::ui::BannerList;
use crate::domain::a002_pickup_point::ui::details::PickupPointDetails;
use crate::domain::a002_pickup_point::ui::list::PickupPointList;
use crate::domain::a003_archived_product::ui::list::ArchivedProductList;
use crate::layout::global_context::AppGlobalContext;
use crate::projections::p900_weekly_accounting::ui::details::WeeklyReportDetails;
use crate::projections::p900_weekly_accounting::ui::list::WeeklyAccountingList;
use contracts::domain::a001_banner::aggregate::BannerKind;
use leptos::prelude::*;

/// Рендерит контент таба по его ключу.
///
/// `tabs_store` нужен detail-видам, чтобы закрыть собственный таб.
pub fn render_tab_content(key: &str, tabs_store: AppGlobalContext) -> AnyView {
    let key_for_close = key.to_string();
    let on_close = Callback::new(move |_: ()| tabs_store.close_tab(&key_for_close));

    match key {
        // a001: баннеры, отдельный таб на каждый вид
        "a001_banner_market" => view! { <BannerList kind=BannerKind::Market /> }.into_any(),
        "a001_banner_top_ad" => view! { <BannerList kind=BannerKind::TopAd /> }.into_any(),

        // a002: пункты выдачи
        "a002_pickup_point" => view! { <PickupPointList /> }.into_any(),
        PICKUP_POINT_NEW => view! { <PickupPointDetails id=None on_close=on_close /> }.into_any(),
        k if k.starts_with(PICKUP_POINT_DETAIL_PREFIX) => {
            let id = k.trim_start_matches(PICKUP_POINT_DETAIL_PREFIX).to_string();
            view! { <PickupPointDetails id=Some(id) on_close=on_close /> }.into_any()
        }

        // a003: архив товаров
        "a003_archived_product" => view! { <ArchivedProductList /> }.into_any(),

        // p900: недельные расчёты
        "p900_weekly_accounting" => view! { <WeeklyAccountingList /> }.into_any(),
        k if k.starts_with(WEEKLY_REPORT_PREFIX) => {
            let week_id = k.trim_start_matches(WEEKLY_REPORT_PREFIX).to_string();
            view! { <WeeklyReportDetails week_id=week_id /> }.into_any()
        }

        // d400: метрики
        "d400_usage_metrics" => view! { <UsageMetricsDashboard /> }.into_any(),

        _ => {
            log::warn!("Unknown tab type: {}", key);
            view! { <div class="placeholder">{"Not implemented yet"}</div> }.into_any()
        }
    }
}
