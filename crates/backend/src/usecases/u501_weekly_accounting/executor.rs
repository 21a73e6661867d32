use anyhow::Result;
use chrono::Utc;
use contracts::projections::p900_weekly_accounting::week::WeekBounds;
use contracts::shared::live::{ChangeKind, LiveCollection};
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_weekly_accounting::WeeklyAccounting;

use super::aggregation::aggregate;
use crate::domain::{a004_marketplace_order, a005_shop};
use crate::projections::p900_weekly_accounting::repository;
use crate::shared::state::AppState;

/// Расчёт недели. Отчёт уже должен быть в `processing`.
///
/// Любая ошибка переводит отчёт в `failed` с текстом ошибки.
pub async fn run(state: &AppState, bounds: WeekBounds) {
    let week_id = bounds.week_id();
    let job = WeeklyAccounting::full_name();
    tracing::info!("{} {}: started", job, week_id);

    match calculate(state, &bounds).await {
        Ok(sellers) => {
            tracing::info!("{} {}: completed, {} seller(s)", job, week_id, sellers);
        }
        Err(e) => {
            tracing::error!("{} {} failed: {:#}", job, week_id, e);
            if let Err(save_err) =
                repository::fail(&state.db, &week_id, &format!("{:#}", e), Utc::now()).await
            {
                tracing::error!("{} {}: cannot save failure: {}", job, week_id, save_err);
            }
        }
    }

    state
        .live
        .notify(LiveCollection::WeeklyReport, ChangeKind::Updated, week_id);
}

async fn calculate(state: &AppState, bounds: &WeekBounds) -> Result<usize> {
    let week_id = bounds.week_id();
    let from = bounds.start_of_week().and_utc();
    let to = bounds.next().start_of_week().and_utc();

    let lines = a004_marketplace_order::service::list_between(state, from, to).await?;
    let shop_names = a005_shop::repository::names(&state.db).await?;
    tracing::debug!("Weekly accounting {}: {} order line(s)", week_id, lines.len());

    let (sales, totals) = aggregate(&week_id, &lines, &shop_names);
    repository::complete(&state.db, &week_id, &totals, &sales, Utc::now()).await?;
    Ok(sales.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a004_marketplace_order::service::{import, tests::line};
    use crate::projections::p900_weekly_accounting::repository::tests::bounds;
    use chrono::TimeZone;
    use contracts::domain::a004_marketplace_order::aggregate::OrderLineStatus;
    use contracts::projections::p900_weekly_accounting::dto::{ReportStatus, SaleSortField};

    #[tokio::test]
    async fn test_run_aggregates_only_the_week() {
        let (_dir, state) = AppState::for_tests().await;
        let inside = Utc.with_ymd_and_hms(2025, 1, 12, 23, 59, 59).unwrap();
        let outside = Utc.with_ymd_and_hms(2025, 1, 13, 0, 0, 0).unwrap();
        import(
            &state,
            vec![
                line("o-1", "s-1", 100.0, 1, OrderLineStatus::Delivered, inside),
                line("o-2", "s-1", 100.0, 1, OrderLineStatus::Delivered, outside),
            ],
        )
        .await
        .unwrap();

        repository::claim_for_processing(&state.db, &bounds(), Utc::now())
            .await
            .unwrap();
        let mut events = state.live.subscribe();
        run(&state, bounds()).await;

        let report = repository::get_report(&state.db, "2025-01-06").await.unwrap().unwrap();
        assert_eq!(report.status, ReportStatus::Completed);
        assert_eq!(report.total_revenue, 100.0);
        assert_eq!(report.seller_count, 1);

        let page = repository::sales_page(&state.db, "2025-01-06", SaleSortField::Revenue, 20, None)
            .await
            .unwrap();
        assert_eq!(page.items[0].order_count, 1);

        let event = events.recv().await.unwrap();
        assert_eq!(event.collection, LiveCollection::WeeklyReport);
        assert_eq!(event.id, "2025-01-06");
    }
}
