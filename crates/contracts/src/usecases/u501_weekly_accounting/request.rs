use serde::{Deserialize, Serialize};

use chrono::NaiveDateTime;

use crate::projections::p900_weekly_accounting::week::{
    is_week_incomplete, parse_week_id, previous_complete_week, WeekBounds,
};

/// Какую неделю считать
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    /// Неделя из `week_id`
    #[default]
    Week,
    /// Последняя завершённая неделя относительно текущего времени (UTC)
    PreviousWeek,
}

/// Запрос на запуск расчёта недельного отчёта
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerRequest {
    #[serde(default)]
    pub mode: TriggerMode,

    #[serde(default)]
    pub week_id: Option<String>,

    /// Пересчитать, даже если отчёт уже рассчитан
    #[serde(default)]
    pub force_recalculate: bool,
}

impl TriggerRequest {
    pub fn for_week(week_id: impl Into<String>, force_recalculate: bool) -> Self {
        Self {
            mode: TriggerMode::Week,
            week_id: Some(week_id.into()),
            force_recalculate,
        }
    }

    pub fn previous_week() -> Self {
        Self {
            mode: TriggerMode::PreviousWeek,
            week_id: None,
            force_recalculate: false,
        }
    }

    /// Неделя для расчёта относительно `now`. Текущая и будущие недели не считаются.
    pub fn resolve_week(&self, now: NaiveDateTime) -> Result<WeekBounds, String> {
        let bounds = match self.mode {
            TriggerMode::Week => {
                let raw = self
                    .week_id
                    .as_deref()
                    .filter(|s| !s.trim().is_empty())
                    .ok_or_else(|| "week_id is required for mode 'week'".to_string())?;
                WeekBounds::containing(parse_week_id(raw)?)
            }
            TriggerMode::PreviousWeek => previous_complete_week(now.date()),
        };
        if is_week_incomplete(bounds.sunday, now) {
            return Err(format!("week {} is not complete yet", bounds.week_id()));
        }
        Ok(bounds)
    }
}
