use chrono::{DateTime, Utc};
use contracts::domain::a004_marketplace_order::aggregate::{OrderImportResult, OrderLine, OrderLineDto};

use super::repository;
use crate::shared::error::DomainError;
use crate::shared::state::AppState;

/// Загрузка строк заказов. Пакет принимается целиком или не принимается вовсе.
pub async fn import(state: &AppState, dtos: Vec<OrderLineDto>) -> anyhow::Result<OrderImportResult> {
    for (idx, dto) in dtos.iter().enumerate() {
        dto.validate()
            .map_err(|e| DomainError::validation(format!("Line {}: {}", idx + 1, e)))?;
    }

    let lines: Vec<OrderLine> = dtos.iter().map(OrderLine::new_for_insert).collect();
    let inserted = repository::insert_many(&state.db, &lines).await?;
    tracing::info!("Imported {} order line(s)", inserted);

    Ok(OrderImportResult { inserted })
}

pub async fn list_between(
    state: &AppState,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> anyhow::Result<Vec<OrderLine>> {
    repository::list_between(&state.db, from, to).await
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::shared::error::ApiError;
    use axum::http::StatusCode;
    use chrono::TimeZone;
    use contracts::domain::a004_marketplace_order::aggregate::OrderLineStatus;

    pub(crate) fn line(
        order_id: &str,
        seller_id: &str,
        price: f64,
        quantity: i64,
        status: OrderLineStatus,
        ordered_at: DateTime<Utc>,
    ) -> OrderLineDto {
        OrderLineDto {
            order_id: order_id.into(),
            seller_id: seller_id.into(),
            seller_name: format!("Seller {}", seller_id),
            product_id: format!("prod-{}", order_id),
            product_name: "Towel".into(),
            category: Some("home_living".into()),
            quantity,
            unit_price: price,
            commission_rate: 0.1,
            status,
            ordered_at,
        }
    }

    #[tokio::test]
    async fn test_import_and_range_query() {
        let (_dir, state) = AppState::for_tests().await;
        let monday = Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap();
        let next_monday = Utc.with_ymd_and_hms(2025, 1, 13, 0, 0, 0).unwrap();

        let result = import(
            &state,
            vec![
                line("o-1", "s-1", 100.0, 1, OrderLineStatus::Delivered, monday),
                line("o-2", "s-1", 50.0, 2, OrderLineStatus::Pending, next_monday - chrono::Duration::seconds(1)),
                line("o-3", "s-2", 70.0, 1, OrderLineStatus::Delivered, next_monday),
            ],
        )
        .await
        .unwrap();
        assert_eq!(result.inserted, 3);

        let week = list_between(&state, monday, next_monday).await.unwrap();
        let orders: Vec<&str> = week.iter().map(|l| l.order_id.as_str()).collect();
        assert_eq!(orders, vec!["o-1", "o-2"]);
    }

    #[tokio::test]
    async fn test_invalid_line_rejects_batch() {
        let (_dir, state) = AppState::for_tests().await;
        let at = Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 0).unwrap();
        let mut bad = line("o-2", "s-1", 10.0, 1, OrderLineStatus::Pending, at);
        bad.quantity = 0;

        let err = import(
            &state,
            vec![line("o-1", "s-1", 10.0, 1, OrderLineStatus::Pending, at), bad],
        )
        .await
        .unwrap_err();
        let err = ApiError::from(err);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.body().error.starts_with("Line 2"));

        let all = list_between(&state, at - chrono::Duration::days(1), at + chrono::Duration::days(1))
            .await
            .unwrap();
        assert!(all.is_empty());
    }
}
