use contracts::projections::p900_weekly_accounting::dto::{
    SalesPage, SalesPageQuery, SetPaidRequest, WeeklyReport,
};

use crate::shared::api_utils::{get_json, message, put_json};

/// Отчёты недель, пересекающихся с месяцем
pub async fn fetch_reports(year: i32, month: u32) -> Result<Vec<WeeklyReport>, String> {
    get_json(&format!(
        "/api/p900/weekly-reports?year={}&month={}",
        year, month
    ))
    .await
    .map_err(message)
}

pub async fn fetch_report(week_id: &str) -> Result<WeeklyReport, String> {
    get_json(&format!("/api/p900/weekly-reports/{}", week_id))
        .await
        .map_err(message)
}

pub async fn fetch_sales_page(week_id: &str, query: &SalesPageQuery) -> Result<SalesPage, String> {
    let qs = serde_qs::to_string(query).map_err(|e| format!("Failed to encode query: {}", e))?;
    get_json(&format!("/api/p900/weekly-reports/{}/sales?{}", week_id, qs))
        .await
        .map_err(message)
}

pub async fn set_paid(week_id: &str, is_paid: bool) -> Result<WeeklyReport, String> {
    put_json(
        &format!("/api/p900/weekly-reports/{}/paid", week_id),
        &SetPaidRequest { is_paid },
    )
    .await
    .map_err(message)
}
