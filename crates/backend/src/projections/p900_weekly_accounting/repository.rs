use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use contracts::projections::p900_weekly_accounting::dto::{
    CategoryStat, ReportStatus, SaleSortField, SalesPage, ShopSale, WeeklyReport,
};
use contracts::projections::p900_weekly_accounting::week::{WeekBounds, WEEK_ID_FORMAT};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, Value,
};
use std::collections::BTreeMap;

use crate::shared::error::DomainError;

/// Отчёт за неделю, ключ `week_id`
pub mod report {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "p900_weekly_report")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub week_id: String,
        pub week_start: String,
        pub week_end: String,
        pub status: String,
        #[sea_orm(nullable)]
        pub error_message: Option<String>,
        pub total_revenue: f64,
        pub total_commission: f64,
        pub total_orders: i64,
        pub total_quantity: i64,
        pub seller_count: i64,
        pub is_paid: bool,
        #[sea_orm(nullable)]
        pub paid_by: Option<String>,
        #[sea_orm(nullable)]
        pub paid_at: Option<chrono::DateTime<chrono::Utc>>,
        #[sea_orm(nullable)]
        pub calculated_at: Option<chrono::DateTime<chrono::Utc>>,
        pub updated_at: chrono::DateTime<chrono::Utc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Строки продаж отчёта, id = `{week_id}_{seller_id}`
pub mod sale {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "p900_shop_sale")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub week_id: String,
        pub seller_id: String,
        pub seller_name: String,
        pub revenue: f64,
        pub quantity: i64,
        pub commission: f64,
        pub net: f64,
        pub order_count: i64,
        pub category_breakdown: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Итоги недели для записи вместе со строками продаж
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportTotals {
    pub total_revenue: f64,
    pub total_commission: f64,
    pub total_orders: i64,
    pub total_quantity: i64,
    pub seller_count: i64,
}

pub const INTERRUPTED_MESSAGE: &str = "interrupted by restart";

fn sale_id(week_id: &str, seller_id: &str) -> String {
    format!("{}_{}", week_id, seller_id)
}

fn parse_date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, WEEK_ID_FORMAT).unwrap_or_default()
}

impl From<report::Model> for WeeklyReport {
    fn from(m: report::Model) -> Self {
        let status = m.status.parse::<ReportStatus>().unwrap_or_else(|e| {
            tracing::warn!("Weekly report {}: {}", m.week_id, e);
            ReportStatus::Failed
        });
        WeeklyReport {
            week_start: parse_date(&m.week_start),
            week_end: parse_date(&m.week_end),
            week_id: m.week_id,
            status,
            error_message: m.error_message,
            total_revenue: m.total_revenue,
            total_commission: m.total_commission,
            total_orders: m.total_orders,
            total_quantity: m.total_quantity,
            seller_count: m.seller_count,
            is_paid: m.is_paid,
            paid_by: m.paid_by,
            paid_at: m.paid_at,
            calculated_at: m.calculated_at,
        }
    }
}

impl From<sale::Model> for ShopSale {
    fn from(m: sale::Model) -> Self {
        let category_breakdown: BTreeMap<String, CategoryStat> =
            serde_json::from_str(&m.category_breakdown).unwrap_or_default();
        ShopSale {
            week_id: m.week_id,
            seller_id: m.seller_id,
            seller_name: m.seller_name,
            revenue: m.revenue,
            quantity: m.quantity,
            commission: m.commission,
            net: m.net,
            order_count: m.order_count,
            category_breakdown,
        }
    }
}

fn sale_to_active(s: &ShopSale) -> Result<sale::ActiveModel> {
    Ok(sale::ActiveModel {
        id: Set(sale_id(&s.week_id, &s.seller_id)),
        week_id: Set(s.week_id.clone()),
        seller_id: Set(s.seller_id.clone()),
        seller_name: Set(s.seller_name.clone()),
        revenue: Set(s.revenue),
        quantity: Set(s.quantity),
        commission: Set(s.commission),
        net: Set(s.net),
        order_count: Set(s.order_count),
        category_breakdown: Set(serde_json::to_string(&s.category_breakdown)?),
    })
}

fn sort_column(field: SaleSortField) -> sale::Column {
    match field {
        SaleSortField::Revenue => sale::Column::Revenue,
        SaleSortField::Quantity => sale::Column::Quantity,
        SaleSortField::Commission => sale::Column::Commission,
        SaleSortField::Net => sale::Column::Net,
        SaleSortField::OrderCount => sale::Column::OrderCount,
    }
}

fn sort_value(field: SaleSortField, m: &sale::Model) -> Value {
    match field {
        SaleSortField::Revenue => m.revenue.into(),
        SaleSortField::Quantity => m.quantity.into(),
        SaleSortField::Commission => m.commission.into(),
        SaleSortField::Net => m.net.into(),
        SaleSortField::OrderCount => m.order_count.into(),
    }
}

// ============================================================================
// Reports
// ============================================================================

pub async fn get_report(db: &DatabaseConnection, week_id: &str) -> Result<Option<WeeklyReport>> {
    let result = report::Entity::find_by_id(week_id.to_string()).one(db).await?;
    Ok(result.map(Into::into))
}

/// Отчёты по списку недель, в порядке недель
pub async fn list_reports(db: &DatabaseConnection, week_ids: &[String]) -> Result<Vec<WeeklyReport>> {
    if week_ids.is_empty() {
        return Ok(Vec::new());
    }
    let items = report::Entity::find()
        .filter(report::Column::WeekId.is_in(week_ids.iter().cloned()))
        .order_by_asc(report::Column::WeekId)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Переводит отчёт недели в `processing`.
///
/// Возвращает `false`, если расчёт уже идёт. Флаг оплаты не трогает.
pub async fn claim_for_processing(
    db: &DatabaseConnection,
    bounds: &WeekBounds,
    now: DateTime<Utc>,
) -> Result<bool> {
    let week_id = bounds.week_id();
    let existing = report::Entity::find_by_id(week_id.clone()).one(db).await?;

    if existing.is_some() {
        let result = report::Entity::update_many()
            .col_expr(report::Column::Status, Expr::value(ReportStatus::Processing.as_str()))
            .col_expr(report::Column::ErrorMessage, Expr::value(Option::<String>::None))
            .col_expr(report::Column::UpdatedAt, Expr::value(now))
            .filter(report::Column::WeekId.eq(week_id.as_str()))
            .filter(report::Column::Status.ne(ReportStatus::Processing.as_str()))
            .exec(db)
            .await?;
        return Ok(result.rows_affected == 1);
    }

    let fresh = WeeklyReport::processing(bounds);
    let active = report::ActiveModel {
        week_id: Set(fresh.week_id),
        week_start: Set(fresh.week_start.format(WEEK_ID_FORMAT).to_string()),
        week_end: Set(fresh.week_end.format(WEEK_ID_FORMAT).to_string()),
        status: Set(fresh.status.as_str().to_string()),
        error_message: Set(None),
        total_revenue: Set(0.0),
        total_commission: Set(0.0),
        total_orders: Set(0),
        total_quantity: Set(0),
        seller_count: Set(0),
        is_paid: Set(false),
        paid_by: Set(None),
        paid_at: Set(None),
        calculated_at: Set(None),
        updated_at: Set(now),
    };
    match active.insert(db).await {
        Ok(_) => Ok(true),
        Err(e) => {
            // Параллельный запуск успел вставить строку первым
            tracing::warn!("Weekly report {} claim lost: {}", week_id, e);
            Ok(false)
        }
    }
}

/// Записывает результат расчёта: строки продаж заменяются целиком
pub async fn complete(
    db: &DatabaseConnection,
    week_id: &str,
    totals: &ReportTotals,
    sales: &[ShopSale],
    now: DateTime<Utc>,
) -> Result<()> {
    let txn = db.begin().await?;

    sale::Entity::delete_many()
        .filter(sale::Column::WeekId.eq(week_id))
        .exec(&txn)
        .await?;

    for s in sales {
        sale_to_active(s)?.insert(&txn).await?;
    }

    report::Entity::update_many()
        .col_expr(report::Column::Status, Expr::value(ReportStatus::Completed.as_str()))
        .col_expr(report::Column::ErrorMessage, Expr::value(Option::<String>::None))
        .col_expr(report::Column::TotalRevenue, Expr::value(totals.total_revenue))
        .col_expr(report::Column::TotalCommission, Expr::value(totals.total_commission))
        .col_expr(report::Column::TotalOrders, Expr::value(totals.total_orders))
        .col_expr(report::Column::TotalQuantity, Expr::value(totals.total_quantity))
        .col_expr(report::Column::SellerCount, Expr::value(totals.seller_count))
        .col_expr(report::Column::CalculatedAt, Expr::value(Some(now)))
        .col_expr(report::Column::UpdatedAt, Expr::value(now))
        .filter(report::Column::WeekId.eq(week_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    Ok(())
}

pub async fn fail(db: &DatabaseConnection, week_id: &str, message: &str, now: DateTime<Utc>) -> Result<()> {
    report::Entity::update_many()
        .col_expr(report::Column::Status, Expr::value(ReportStatus::Failed.as_str()))
        .col_expr(report::Column::ErrorMessage, Expr::value(Some(message.to_string())))
        .col_expr(report::Column::UpdatedAt, Expr::value(now))
        .filter(report::Column::WeekId.eq(week_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Отчёты, оставшиеся в `processing` после остановки процесса, помечаются как failed
pub async fn fail_interrupted(db: &DatabaseConnection) -> Result<u64> {
    let result = report::Entity::update_many()
        .col_expr(report::Column::Status, Expr::value(ReportStatus::Failed.as_str()))
        .col_expr(report::Column::ErrorMessage, Expr::value(Some(INTERRUPTED_MESSAGE.to_string())))
        .col_expr(report::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(report::Column::Status.eq(ReportStatus::Processing.as_str()))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn set_paid(
    db: &DatabaseConnection,
    week_id: &str,
    is_paid: bool,
    paid_by: Option<String>,
    paid_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<()> {
    report::Entity::update_many()
        .col_expr(report::Column::IsPaid, Expr::value(is_paid))
        .col_expr(report::Column::PaidBy, Expr::value(paid_by))
        .col_expr(report::Column::PaidAt, Expr::value(paid_at))
        .col_expr(report::Column::UpdatedAt, Expr::value(now))
        .filter(report::Column::WeekId.eq(week_id))
        .exec(db)
        .await?;
    Ok(())
}

// ============================================================================
// Sales
// ============================================================================

/// Страница строк продаж: поле DESC, затем seller_id ASC.
///
/// `after`: seller_id последней строки предыдущей страницы. Следующая
/// страница начинается строго после неё в том же порядке.
pub async fn sales_page(
    db: &DatabaseConnection,
    week_id: &str,
    sort: SaleSortField,
    limit: u64,
    after: Option<&str>,
) -> Result<SalesPage> {
    let column = sort_column(sort);

    let mut query = sale::Entity::find().filter(sale::Column::WeekId.eq(week_id));

    if let Some(after) = after {
        let cursor = sale::Entity::find_by_id(sale_id(week_id, after))
            .one(db)
            .await?
            .ok_or_else(|| DomainError::validation(format!("Unknown cursor: {}", after)))?;
        let value = sort_value(sort, &cursor);
        query = query.filter(
            Condition::any().add(column.lt(value.clone())).add(
                Condition::all()
                    .add(column.eq(value))
                    .add(sale::Column::SellerId.gt(after)),
            ),
        );
    }

    let mut rows = query
        .order_by_desc(column)
        .order_by_asc(sale::Column::SellerId)
        .limit(limit + 1)
        .all(db)
        .await?;

    let has_more = rows.len() as u64 > limit;
    rows.truncate(limit as usize);

    let items: Vec<ShopSale> = rows.into_iter().map(Into::into).collect();
    let next_cursor = if has_more {
        items.last().map(|s| s.seller_id.clone())
    } else {
        None
    };

    Ok(SalesPage {
        items,
        next_cursor,
        has_more,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::shared::data::db::test_database;
    use chrono::TimeZone;

    pub(crate) fn bounds() -> WeekBounds {
        WeekBounds::containing(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap())
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 14, 3, 0, 0).unwrap()
    }

    pub(crate) fn sale_line(seller_id: &str, revenue: f64, quantity: i64) -> ShopSale {
        ShopSale {
            week_id: "2025-01-06".into(),
            seller_id: seller_id.into(),
            seller_name: format!("Seller {}", seller_id),
            revenue,
            quantity,
            commission: revenue * 0.1,
            net: revenue * 0.9,
            order_count: 1,
            category_breakdown: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn test_claim_is_exclusive() {
        let (_dir, db) = test_database().await;
        assert!(claim_for_processing(&db, &bounds(), now()).await.unwrap());
        assert!(!claim_for_processing(&db, &bounds(), now()).await.unwrap());

        fail(&db, "2025-01-06", "boom", now()).await.unwrap();
        let report = get_report(&db, "2025-01-06").await.unwrap().unwrap();
        assert_eq!(report.status, ReportStatus::Failed);
        assert_eq!(report.error_message.as_deref(), Some("boom"));

        assert!(claim_for_processing(&db, &bounds(), now()).await.unwrap());
        let report = get_report(&db, "2025-01-06").await.unwrap().unwrap();
        assert_eq!(report.status, ReportStatus::Processing);
        assert!(report.error_message.is_none());
    }

    #[tokio::test]
    async fn test_complete_replaces_sales_and_keeps_paid_flag() {
        let (_dir, db) = test_database().await;
        claim_for_processing(&db, &bounds(), now()).await.unwrap();
        let totals = ReportTotals {
            total_revenue: 300.0,
            ..Default::default()
        };
        complete(&db, "2025-01-06", &totals, &[sale_line("s-1", 100.0, 1), sale_line("s-2", 200.0, 2)], now())
            .await
            .unwrap();
        set_paid(&db, "2025-01-06", true, Some("admin".into()), Some(now()), now())
            .await
            .unwrap();

        claim_for_processing(&db, &bounds(), now()).await.unwrap();
        complete(&db, "2025-01-06", &totals, &[sale_line("s-3", 50.0, 1)], now())
            .await
            .unwrap();

        let report = get_report(&db, "2025-01-06").await.unwrap().unwrap();
        assert_eq!(report.status, ReportStatus::Completed);
        assert!(report.is_paid);
        assert_eq!(report.paid_by.as_deref(), Some("admin"));
        assert!(report.calculated_at.is_some());

        let page = sales_page(&db, "2025-01-06", SaleSortField::Revenue, 20, None)
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].seller_id, "s-3");
    }

    #[tokio::test]
    async fn test_fail_interrupted() {
        let (_dir, db) = test_database().await;
        claim_for_processing(&db, &bounds(), now()).await.unwrap();
        assert_eq!(fail_interrupted(&db).await.unwrap(), 1);
        let report = get_report(&db, "2025-01-06").await.unwrap().unwrap();
        assert_eq!(report.status, ReportStatus::Failed);
        assert_eq!(report.error_message.as_deref(), Some(INTERRUPTED_MESSAGE));
        assert_eq!(fail_interrupted(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_cursor_pagination_with_ties() {
        let (_dir, db) = test_database().await;
        claim_for_processing(&db, &bounds(), now()).await.unwrap();
        let sales = vec![
            sale_line("s-a", 500.0, 1),
            sale_line("s-b", 300.0, 5),
            sale_line("s-c", 300.0, 2),
            sale_line("s-d", 300.0, 9),
            sale_line("s-e", 100.0, 3),
        ];
        complete(&db, "2025-01-06", &ReportTotals::default(), &sales, now())
            .await
            .unwrap();

        let mut seen = Vec::new();
        let mut after: Option<String> = None;
        loop {
            let page = sales_page(&db, "2025-01-06", SaleSortField::Revenue, 2, after.as_deref())
                .await
                .unwrap();
            seen.extend(page.items.iter().map(|s| s.seller_id.clone()));
            if !page.has_more {
                assert!(page.next_cursor.is_none());
                break;
            }
            after = page.next_cursor;
        }
        assert_eq!(seen, vec!["s-a", "s-b", "s-c", "s-d", "s-e"]);

        let by_quantity = sales_page(&db, "2025-01-06", SaleSortField::Quantity, 3, None)
            .await
            .unwrap();
        let ids: Vec<&str> = by_quantity.items.iter().map(|s| s.seller_id.as_str()).collect();
        assert_eq!(ids, vec!["s-d", "s-b", "s-e"]);
        assert_eq!(by_quantity.next_cursor.as_deref(), Some("s-e"));
    }

    #[tokio::test]
    async fn test_unknown_cursor_is_rejected() {
        let (_dir, db) = test_database().await;
        let err = sales_page(&db, "2025-01-06", SaleSortField::Revenue, 20, Some("ghost"))
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<DomainError>().is_some());
    }

    #[tokio::test]
    async fn test_list_reports_filters_by_week() {
        let (_dir, db) = test_database().await;
        claim_for_processing(&db, &bounds(), now()).await.unwrap();
        claim_for_processing(&db, &bounds().next(), now()).await.unwrap();
        let reports = list_reports(&db, &["2025-01-13".to_string(), "2025-02-03".to_string()])
            .await
            .unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].week_id, "2025-01-13");
        assert_eq!(reports[0].week_end, NaiveDate::from_ymd_opt(2025, 1, 19).unwrap());
        assert!(list_reports(&db, &[]).await.unwrap().is_empty());
    }
}
