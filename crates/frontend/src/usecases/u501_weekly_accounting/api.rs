use contracts::usecases::u501_weekly_accounting::{TriggerRequest, TriggerResponse};

use crate::shared::api_utils::{message, post_json};

/// Запуск расчёта недели. Ошибка сервера возвращается как есть.
pub async fn trigger(request: TriggerRequest) -> Result<TriggerResponse, String> {
    post_json("/api/u501/weekly-accounting/trigger", &request)
        .await
        .map_err(message)
}
