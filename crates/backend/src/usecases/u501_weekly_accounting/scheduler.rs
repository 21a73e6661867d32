use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use cron::Schedule;
use std::str::FromStr;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info};

use super::service;
use crate::shared::state::AppState;
use contracts::usecases::u501_weekly_accounting::{TriggerRequest, TriggerStatus};

/// Как часто проверять, не наступило ли время по расписанию
const CHECK_INTERVAL_SECS: u64 = 60;

/// Фоновый запуск расчёта прошлой недели по cron-расписанию
pub struct AccountingScheduler {
    state: AppState,
    schedule: Schedule,
}

impl AccountingScheduler {
    pub fn new(state: AppState, expression: &str) -> Result<Self> {
        let schedule = Schedule::from_str(expression)
            .with_context(|| format!("Invalid accounting schedule '{}'", expression))?;
        Ok(Self { state, schedule })
    }

    /// Было ли срабатывание расписания в полуинтервале `(from, to]`
    fn is_due(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
        self.schedule
            .after(&from)
            .next()
            .map_or(false, |at| at <= to)
    }

    pub async fn run_loop(self) {
        if let Some(next) = self.schedule.upcoming(Utc).next() {
            info!("Accounting scheduler started, next run at {}", next);
        }
        let mut interval = time::interval(time::Duration::from_secs(CHECK_INTERVAL_SECS));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut last_check = Utc::now();
        loop {
            interval.tick().await;
            let now = Utc::now();
            if self.is_due(last_check, now) {
                self.run_once().await;
            }
            last_check = now;
        }
    }

    async fn run_once(&self) {
        match service::trigger(&self.state, TriggerRequest::previous_week()).await {
            Ok(response) => match response.status {
                TriggerStatus::Started => {
                    info!("Scheduled weekly accounting started for {}", response.week_id)
                }
                TriggerStatus::AlreadyCalculated => {
                    info!("Scheduled weekly accounting: {} already calculated", response.week_id)
                }
            },
            Err(e) => error!("Scheduled weekly accounting failed: {:#}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_schedule_due_window() {
        let (_dir, state) = AppState::for_tests().await;
        let scheduler = AccountingScheduler::new(state, "0 0 3 * * Mon").unwrap();

        // 2025-01-13: понедельник
        let before = Utc.with_ymd_and_hms(2025, 1, 13, 2, 59, 30).unwrap();
        let after = Utc.with_ymd_and_hms(2025, 1, 13, 3, 0, 30).unwrap();
        assert!(scheduler.is_due(before, after));
        assert!(!scheduler.is_due(after, after + chrono::Duration::minutes(1)));
        assert!(!scheduler.is_due(before - chrono::Duration::days(1), before));
    }

    #[tokio::test]
    async fn test_invalid_expression() {
        let (_dir, state) = AppState::for_tests().await;
        assert!(AccountingScheduler::new(state, "every monday").is_err());
    }
}
