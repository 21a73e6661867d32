use chrono::{DateTime, Utc};
use contracts::domain::a004_marketplace_order::aggregate::{OrderLine, OrderLineId, OrderLineStatus};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a004_order_line")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub order_id: String,
    pub seller_id: String,
    pub seller_name: String,
    pub product_id: String,
    pub product_name: String,
    pub category: Option<String>,
    pub quantity: i64,
    pub unit_price: f64,
    pub commission_rate: f64,
    pub status: String,
    pub ordered_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for OrderLine {
    fn from(m: Model) -> Self {
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let status = m.status.parse::<OrderLineStatus>().unwrap_or_else(|e| {
            tracing::warn!("Order line {}: {}", m.id, e);
            OrderLineStatus::Pending
        });
        OrderLine {
            id: OrderLineId(uuid),
            order_id: m.order_id,
            seller_id: m.seller_id,
            seller_name: m.seller_name,
            product_id: m.product_id,
            product_name: m.product_name,
            category: m.category,
            quantity: m.quantity,
            unit_price: m.unit_price,
            commission_rate: m.commission_rate,
            status,
            ordered_at: m.ordered_at,
        }
    }
}

fn to_active(line: &OrderLine) -> ActiveModel {
    ActiveModel {
        id: Set(line.to_string_id()),
        order_id: Set(line.order_id.clone()),
        seller_id: Set(line.seller_id.clone()),
        seller_name: Set(line.seller_name.clone()),
        product_id: Set(line.product_id.clone()),
        product_name: Set(line.product_name.clone()),
        category: Set(line.category.clone()),
        quantity: Set(line.quantity),
        unit_price: Set(line.unit_price),
        commission_rate: Set(line.commission_rate),
        status: Set(line.status.as_str().to_string()),
        ordered_at: Set(line.ordered_at),
    }
}

/// Вставляет пакет строк одной транзакцией
pub async fn insert_many(db: &DatabaseConnection, lines: &[OrderLine]) -> anyhow::Result<usize> {
    if lines.is_empty() {
        return Ok(0);
    }
    let txn = db.begin().await?;
    for line in lines {
        to_active(line).insert(&txn).await?;
    }
    txn.commit().await?;
    Ok(lines.len())
}

/// Строки с `ordered_at` в полуинтервале `[from, to)`
pub async fn list_between(
    db: &DatabaseConnection,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> anyhow::Result<Vec<OrderLine>> {
    let items = Entity::find()
        .filter(Column::OrderedAt.gte(from))
        .filter(Column::OrderedAt.lt(to))
        .order_by_asc(Column::OrderedAt)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}
