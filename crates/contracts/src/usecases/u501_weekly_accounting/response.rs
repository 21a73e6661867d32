use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerStatus {
    /// Расчёт запущен в фоне, результат появится в отчёте
    Started,
    /// Отчёт уже рассчитан, пересчёт не запрашивался
    AlreadyCalculated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerResponse {
    pub status: TriggerStatus,
    pub week_id: String,
}
