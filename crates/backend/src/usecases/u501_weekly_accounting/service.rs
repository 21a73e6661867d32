use chrono::{NaiveDateTime, Utc};
use contracts::projections::p900_weekly_accounting::dto::ReportStatus;
use contracts::shared::live::{ChangeKind, LiveCollection};
use contracts::usecases::u501_weekly_accounting::{TriggerRequest, TriggerResponse, TriggerStatus};

use super::executor;
use crate::projections::p900_weekly_accounting::repository;
use crate::shared::error::DomainError;
use crate::shared::state::AppState;

pub const ALREADY_RUNNING: &str = "calculation already in progress";

/// Запуск расчёта недели. Сам расчёт идёт в фоне, результат читается из отчёта.
pub async fn trigger(state: &AppState, request: TriggerRequest) -> anyhow::Result<TriggerResponse> {
    trigger_for_day(state, request, Utc::now().naive_utc()).await
}

pub(crate) async fn trigger_for_day(
    state: &AppState,
    request: TriggerRequest,
    now: NaiveDateTime,
) -> anyhow::Result<TriggerResponse> {
    let bounds = request.resolve_week(now).map_err(DomainError::validation)?;
    let week_id = bounds.week_id();

    if let Some(existing) = repository::get_report(&state.db, &week_id).await? {
        match existing.status {
            ReportStatus::Completed if !request.force_recalculate => {
                tracing::info!("Weekly accounting {}: already calculated", week_id);
                return Ok(TriggerResponse {
                    status: TriggerStatus::AlreadyCalculated,
                    week_id,
                });
            }
            ReportStatus::Processing => return Err(DomainError::conflict(ALREADY_RUNNING)),
            _ => {}
        }
    }

    if !repository::claim_for_processing(&state.db, &bounds, Utc::now()).await? {
        return Err(DomainError::conflict(ALREADY_RUNNING));
    }
    state
        .live
        .notify(LiveCollection::WeeklyReport, ChangeKind::Updated, week_id.as_str());

    let job_state = state.clone();
    tokio::spawn(async move {
        executor::run(&job_state, bounds).await;
    });

    Ok(TriggerResponse {
        status: TriggerStatus::Started,
        week_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::p900_weekly_accounting::repository::tests::bounds;
    use crate::shared::error::ApiError;
    use axum::http::StatusCode;
    use chrono::NaiveDate;
    use contracts::projections::p900_weekly_accounting::dto::WeeklyReport;

    fn today() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    async fn wait_for_completion(state: &AppState, week_id: &str) -> WeeklyReport {
        for _ in 0..200 {
            let report = repository::get_report(&state.db, week_id).await.unwrap().unwrap();
            if report.status != ReportStatus::Processing {
                return report;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("report {} still processing", week_id);
    }

    #[tokio::test]
    async fn test_trigger_runs_then_reports_already_calculated() {
        let (_dir, state) = AppState::for_tests().await;

        let response = trigger_for_day(&state, TriggerRequest::for_week("2025-01-06", false), today())
            .await
            .unwrap();
        assert_eq!(response.status, TriggerStatus::Started);
        assert_eq!(response.week_id, "2025-01-06");

        let report = wait_for_completion(&state, "2025-01-06").await;
        assert_eq!(report.status, ReportStatus::Completed);

        let again = trigger_for_day(&state, TriggerRequest::for_week("2025-01-06", false), today())
            .await
            .unwrap();
        assert_eq!(again.status, TriggerStatus::AlreadyCalculated);

        let forced = trigger_for_day(&state, TriggerRequest::for_week("2025-01-06", true), today())
            .await
            .unwrap();
        assert_eq!(forced.status, TriggerStatus::Started);
        wait_for_completion(&state, "2025-01-06").await;
    }

    #[tokio::test]
    async fn test_trigger_while_processing_conflicts() {
        let (_dir, state) = AppState::for_tests().await;
        repository::claim_for_processing(&state.db, &bounds(), Utc::now())
            .await
            .unwrap();

        let err = trigger_for_day(&state, TriggerRequest::for_week("2025-01-06", true), today())
            .await
            .unwrap_err();
        let err = ApiError::from(err);
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.body().error, ALREADY_RUNNING);
    }

    #[tokio::test]
    async fn test_previous_week_mode_and_bad_week_id() {
        let (_dir, state) = AppState::for_tests().await;
        let response = trigger_for_day(&state, TriggerRequest::previous_week(), today())
            .await
            .unwrap();
        assert_eq!(response.week_id, "2025-01-06");
        wait_for_completion(&state, "2025-01-06").await;

        let err = trigger_for_day(&state, TriggerRequest::for_week("2025-01-08", false), today())
            .await
            .unwrap_err();
        assert_eq!(ApiError::from(err).status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_incomplete_weeks_rejected_without_report() {
        let (_dir, state) = AppState::for_tests().await;

        for week_id in ["2025-01-13", "2030-01-07"] {
            let err = trigger_for_day(&state, TriggerRequest::for_week(week_id, false), today())
                .await
                .unwrap_err();
            assert_eq!(ApiError::from(err).status(), StatusCode::BAD_REQUEST);
            assert!(repository::get_report(&state.db, week_id).await.unwrap().is_none());
        }
    }
}
