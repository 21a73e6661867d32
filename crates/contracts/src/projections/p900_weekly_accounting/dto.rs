use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use super::week::{is_week_incomplete, WeekBounds};
use crate::shared::search::Searchable;

/// Размер страницы продаж по умолчанию
pub const PAGE_SIZE: u64 = 20;
/// Максимальный размер страницы, который примет сервер
pub const MAX_PAGE_SIZE: u64 = 100;

// ============================================================================
// Report
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Processing,
    Completed,
    Failed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Processing => "processing",
            ReportStatus::Completed => "completed",
            ReportStatus::Failed => "failed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::Processing => "Расчёт…",
            ReportStatus::Completed => "Рассчитан",
            ReportStatus::Failed => "Ошибка",
        }
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(ReportStatus::Processing),
            "completed" => Ok(ReportStatus::Completed),
            "failed" => Ok(ReportStatus::Failed),
            other => Err(format!("Unknown report status: {}", other)),
        }
    }
}

/// Недельный отчёт по продажам (ключ: дата понедельника)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub week_id: String,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub status: ReportStatus,
    #[serde(default)]
    pub error_message: Option<String>,
    pub total_revenue: f64,
    pub total_commission: f64,
    pub total_orders: i64,
    pub total_quantity: i64,
    pub seller_count: i64,
    pub is_paid: bool,
    #[serde(default)]
    pub paid_by: Option<String>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub calculated_at: Option<DateTime<Utc>>,
}

impl WeeklyReport {
    /// Пустой отчёт в статусе `processing` для запуска расчёта
    pub fn processing(bounds: &WeekBounds) -> Self {
        Self {
            week_id: bounds.week_id(),
            week_start: bounds.monday,
            week_end: bounds.sunday,
            status: ReportStatus::Processing,
            error_message: None,
            total_revenue: 0.0,
            total_commission: 0.0,
            total_orders: 0,
            total_quantity: 0,
            seller_count: 0,
            is_paid: false,
            paid_by: None,
            paid_at: None,
            calculated_at: None,
        }
    }

    pub fn bounds(&self) -> WeekBounds {
        WeekBounds {
            monday: self.week_start,
            sunday: self.week_end,
        }
    }

    /// К выплате продавцам: выручка минус комиссия
    pub fn total_net(&self) -> f64 {
        self.total_revenue - self.total_commission
    }

    pub fn commission_share(&self) -> f64 {
        if self.total_revenue > 0.0 {
            self.total_commission / self.total_revenue
        } else {
            0.0
        }
    }
}

// ============================================================================
// Shop sale line
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub revenue: f64,
    pub quantity: i64,
}

/// Итоги продавца за неделю
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopSale {
    pub week_id: String,
    pub seller_id: String,
    pub seller_name: String,
    pub revenue: f64,
    pub quantity: i64,
    pub commission: f64,
    pub net: f64,
    pub order_count: i64,
    #[serde(default)]
    pub category_breakdown: BTreeMap<String, CategoryStat>,
}

impl ShopSale {
    /// Категория с наибольшей выручкой
    pub fn top_category(&self) -> Option<&str> {
        self.category_breakdown
            .iter()
            .max_by(|a, b| {
                a.1.revenue
                    .partial_cmp(&b.1.revenue)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(name, _)| name.as_str())
    }
}

impl Searchable for ShopSale {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.seller_name.as_str(), self.seller_id.as_str()]
    }
}

/// Поле сортировки строк продаж (всегда по убыванию)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SaleSortField {
    #[default]
    Revenue,
    Quantity,
    Commission,
    Net,
    OrderCount,
}

impl SaleSortField {
    pub fn all() -> [SaleSortField; 5] {
        [
            SaleSortField::Revenue,
            SaleSortField::Quantity,
            SaleSortField::Commission,
            SaleSortField::Net,
            SaleSortField::OrderCount,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SaleSortField::Revenue => "revenue",
            SaleSortField::Quantity => "quantity",
            SaleSortField::Commission => "commission",
            SaleSortField::Net => "net",
            SaleSortField::OrderCount => "order_count",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SaleSortField::Revenue => "Выручка",
            SaleSortField::Quantity => "Количество",
            SaleSortField::Commission => "Комиссия",
            SaleSortField::Net => "К выплате",
            SaleSortField::OrderCount => "Заказы",
        }
    }

    /// Значение поля сортировки у строки
    pub fn value_of(&self, sale: &ShopSale) -> f64 {
        match self {
            SaleSortField::Revenue => sale.revenue,
            SaleSortField::Quantity => sale.quantity as f64,
            SaleSortField::Commission => sale.commission,
            SaleSortField::Net => sale.net,
            SaleSortField::OrderCount => sale.order_count as f64,
        }
    }
}

impl FromStr for SaleSortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "revenue" => Ok(SaleSortField::Revenue),
            "quantity" => Ok(SaleSortField::Quantity),
            "commission" => Ok(SaleSortField::Commission),
            "net" => Ok(SaleSortField::Net),
            "order_count" => Ok(SaleSortField::OrderCount),
            other => Err(format!("Unknown sort field: {}", other)),
        }
    }
}

// ============================================================================
// Requests / responses
// ============================================================================

/// Параметры страницы продаж: `?sort_by=&limit=&after=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesPageQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// seller_id последней строки предыдущей страницы
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

impl SalesPageQuery {
    /// Фактический размер страницы: по умолчанию 20, не больше 100
    pub fn effective_limit(&self) -> u64 {
        self.limit.unwrap_or(PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesPage {
    pub items: Vec<ShopSale>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportListQuery {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetPaidRequest {
    pub is_paid: bool,
}

// ============================================================================
// Week list for the month view
// ============================================================================

/// Состояние недели в списке месяца
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekRowState {
    /// Неделя ещё не закончилась
    Incomplete,
    NotCalculated,
    Processing,
    Completed,
    Failed,
}

impl WeekRowState {
    pub fn label(&self) -> &'static str {
        match self {
            WeekRowState::Incomplete => "Неделя не завершена",
            WeekRowState::NotCalculated => "Не рассчитан",
            WeekRowState::Processing => ReportStatus::Processing.label(),
            WeekRowState::Completed => ReportStatus::Completed.label(),
            WeekRowState::Failed => ReportStatus::Failed.label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekRow {
    pub bounds: WeekBounds,
    pub report: Option<WeeklyReport>,
}

impl WeekRow {
    pub fn state(&self, now: NaiveDateTime) -> WeekRowState {
        match &self.report {
            Some(r) => match r.status {
                ReportStatus::Processing => WeekRowState::Processing,
                ReportStatus::Completed => WeekRowState::Completed,
                ReportStatus::Failed => WeekRowState::Failed,
            },
            None if is_week_incomplete(self.bounds.sunday, now) => WeekRowState::Incomplete,
            None => WeekRowState::NotCalculated,
        }
    }

    /// Расчёт можно запускать только для завершённой недели
    pub fn can_trigger(&self, now: NaiveDateTime) -> bool {
        !matches!(
            self.state(now),
            WeekRowState::Incomplete | WeekRowState::Processing
        )
    }
}

/// Склеивает вычисленные недели месяца с отчётами из БД.
/// Отчёты без соответствующей недели отбрасываются.
pub fn merge_weeks_with_reports(weeks: &[WeekBounds], reports: Vec<WeeklyReport>) -> Vec<WeekRow> {
    let mut by_id: HashMap<String, WeeklyReport> = reports
        .into_iter()
        .map(|r| (r.week_id.clone(), r))
        .collect();
    weeks
        .iter()
        .map(|bounds| WeekRow {
            bounds: *bounds,
            report: by_id.remove(&bounds.week_id()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::p900_weekly_accounting::week::weeks_of_month;

    fn report(week_id: &str, status: ReportStatus) -> WeeklyReport {
        let monday = NaiveDate::parse_from_str(week_id, "%Y-%m-%d").unwrap();
        let mut r = WeeklyReport::processing(&WeekBounds::containing(monday));
        r.status = status;
        r
    }

    #[test]
    fn test_merge_keeps_all_weeks() {
        let weeks = weeks_of_month(2025, 1);
        let reports = vec![
            report("2025-01-06", ReportStatus::Completed),
            report("2024-11-04", ReportStatus::Completed),
        ];
        let rows = merge_weeks_with_reports(&weeks, reports);
        assert_eq!(rows.len(), weeks.len());
        assert!(rows[0].report.is_none());
        assert_eq!(rows[1].bounds.week_id(), "2025-01-06");
        assert!(rows[1].report.is_some());
    }

    #[test]
    fn test_week_row_state() {
        let bounds = WeekBounds::containing(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
        let during = NaiveDate::from_ymd_opt(2025, 1, 8)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let after = NaiveDate::from_ymd_opt(2025, 1, 13)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        let row = WeekRow { bounds, report: None };
        assert_eq!(row.state(during), WeekRowState::Incomplete);
        assert!(!row.can_trigger(during));
        assert_eq!(row.state(after), WeekRowState::NotCalculated);
        assert!(row.can_trigger(after));

        let row = WeekRow {
            bounds,
            report: Some(report("2025-01-06", ReportStatus::Processing)),
        };
        assert!(!row.can_trigger(after));
    }

    #[test]
    fn test_sort_field_parsing() {
        assert_eq!(
            "order_count".parse::<SaleSortField>().unwrap(),
            SaleSortField::OrderCount
        );
        assert!("price".parse::<SaleSortField>().is_err());
        for field in SaleSortField::all() {
            assert_eq!(field.as_str().parse::<SaleSortField>().unwrap(), field);
        }
    }

    #[test]
    fn test_effective_limit() {
        assert_eq!(SalesPageQuery::default().effective_limit(), 20);
        let q = SalesPageQuery {
            limit: Some(500),
            ..Default::default()
        };
        assert_eq!(q.effective_limit(), 100);
        let q = SalesPageQuery {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(q.effective_limit(), 1);
    }

    #[test]
    fn test_top_category() {
        let mut sale = ShopSale {
            week_id: "2025-01-06".into(),
            seller_id: "s-1".into(),
            seller_name: "Anadolu".into(),
            revenue: 300.0,
            quantity: 3,
            commission: 30.0,
            net: 270.0,
            order_count: 2,
            category_breakdown: BTreeMap::new(),
        };
        assert!(sale.top_category().is_none());
        sale.category_breakdown.insert(
            "home".into(),
            CategoryStat { revenue: 100.0, quantity: 1 },
        );
        sale.category_breakdown.insert(
            "fashion".into(),
            CategoryStat { revenue: 200.0, quantity: 2 },
        );
        assert_eq!(sale.top_category(), Some("fashion"));
    }
}
