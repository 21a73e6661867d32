use chrono::Utc;
use contracts::projections::p900_weekly_accounting::dto::{
    ReportStatus, SaleSortField, SalesPage, SalesPageQuery, WeeklyReport,
};
use contracts::projections::p900_weekly_accounting::week::{parse_week_id, weeks_of_month};
use contracts::shared::live::{ChangeKind, LiveCollection};

use super::repository;
use crate::shared::error::DomainError;
use crate::shared::state::AppState;

/// Отчёты, попадающие в недели месяца (включая недели на стыке месяцев)
pub async fn list_for_month(state: &AppState, year: i32, month: u32) -> anyhow::Result<Vec<WeeklyReport>> {
    if !(1..=12).contains(&month) {
        return Err(DomainError::validation(format!("Invalid month: {}", month)));
    }
    let week_ids: Vec<String> = weeks_of_month(year, month)
        .iter()
        .map(|w| w.week_id())
        .collect();
    repository::list_reports(&state.db, &week_ids).await
}

fn checked_week_id(week_id: &str) -> anyhow::Result<String> {
    parse_week_id(week_id).map_err(DomainError::validation)?;
    Ok(week_id.trim().to_string())
}

pub async fn get_report(state: &AppState, week_id: &str) -> anyhow::Result<WeeklyReport> {
    let week_id = checked_week_id(week_id)?;
    repository::get_report(&state.db, &week_id)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("Weekly report {}", week_id)))
}

pub async fn sales_page(state: &AppState, week_id: &str, query: &SalesPageQuery) -> anyhow::Result<SalesPage> {
    let week_id = checked_week_id(week_id)?;
    let sort = match query.sort_by.as_deref() {
        Some(raw) => raw.parse::<SaleSortField>().map_err(DomainError::validation)?,
        None => SaleSortField::default(),
    };
    let after = query.after.as_deref().filter(|s| !s.trim().is_empty());
    repository::sales_page(&state.db, &week_id, sort, query.effective_limit(), after).await
}

/// Отметка о выплате. Снятие отметки очищает плательщика и время.
pub async fn set_paid(
    state: &AppState,
    week_id: &str,
    is_paid: bool,
    actor: &str,
) -> anyhow::Result<WeeklyReport> {
    let report = get_report(state, week_id).await?;
    if report.status != ReportStatus::Completed {
        return Err(DomainError::conflict(format!(
            "Report {} is {}, only completed reports can be marked paid",
            report.week_id,
            report.status.as_str()
        )));
    }

    let now = Utc::now();
    let (paid_by, paid_at) = if is_paid {
        (Some(actor.to_string()), Some(now))
    } else {
        (None, None)
    };
    repository::set_paid(&state.db, &report.week_id, is_paid, paid_by, paid_at, now).await?;
    tracing::info!("Weekly report {} paid={} by {}", report.week_id, is_paid, actor);

    state
        .live
        .notify(LiveCollection::WeeklyReport, ChangeKind::Updated, &report.week_id);
    get_report(state, &report.week_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::p900_weekly_accounting::repository::tests::{bounds, sale_line};
    use crate::projections::p900_weekly_accounting::repository::ReportTotals;
    use crate::shared::error::ApiError;
    use axum::http::StatusCode;

    async fn completed_report(state: &AppState) {
        repository::claim_for_processing(&state.db, &bounds(), Utc::now())
            .await
            .unwrap();
        repository::complete(
            &state.db,
            "2025-01-06",
            &ReportTotals::default(),
            &[sale_line("s-1", 10.0, 1)],
            Utc::now(),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_get_report_validates_week_id() {
        let (_dir, state) = AppState::for_tests().await;
        let err = ApiError::from(get_report(&state, "2025-01-07").await.unwrap_err());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let err = ApiError::from(get_report(&state, "2025-01-06").await.unwrap_err());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_set_paid_requires_completed() {
        let (_dir, state) = AppState::for_tests().await;
        repository::claim_for_processing(&state.db, &bounds(), Utc::now())
            .await
            .unwrap();
        let err = ApiError::from(set_paid(&state, "2025-01-06", true, "admin").await.unwrap_err());
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_set_and_clear_paid() {
        let (_dir, state) = AppState::for_tests().await;
        completed_report(&state).await;

        let report = set_paid(&state, "2025-01-06", true, "admin").await.unwrap();
        assert!(report.is_paid);
        assert_eq!(report.paid_by.as_deref(), Some("admin"));
        assert!(report.paid_at.is_some());

        let report = set_paid(&state, "2025-01-06", false, "admin").await.unwrap();
        assert!(!report.is_paid);
        assert!(report.paid_by.is_none());
        assert!(report.paid_at.is_none());
    }

    #[tokio::test]
    async fn test_sales_page_rejects_unknown_sort() {
        let (_dir, state) = AppState::for_tests().await;
        completed_report(&state).await;
        let query = SalesPageQuery {
            sort_by: Some("price".into()),
            ..Default::default()
        };
        let err = ApiError::from(sales_page(&state, "2025-01-06", &query).await.unwrap_err());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let page = sales_page(&state, "2025-01-06", &SalesPageQuery::default())
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn test_list_for_month_includes_overlapping_weeks() {
        let (_dir, state) = AppState::for_tests().await;
        // Неделя 2024-12-30 входит и в декабрь, и в январь
        let overlap = bounds().previous();
        repository::claim_for_processing(&state.db, &overlap, Utc::now())
            .await
            .unwrap();
        let january = list_for_month(&state, 2025, 1).await.unwrap();
        assert_eq!(january.len(), 1);
        let december = list_for_month(&state, 2024, 12).await.unwrap();
        assert_eq!(december.len(), 1);
        assert!(list_for_month(&state, 2025, 13).await.is_err());
    }
}
