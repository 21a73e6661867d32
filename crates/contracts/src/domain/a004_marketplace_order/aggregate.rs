use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::common::{AggregateId, AggregateRoot};

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор строки заказа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderLineId(pub Uuid);

impl OrderLineId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for OrderLineId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(OrderLineId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderLineStatus {
    #[default]
    Pending,
    Delivered,
    Cancelled,
    Returned,
}

impl OrderLineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderLineStatus::Pending => "pending",
            OrderLineStatus::Delivered => "delivered",
            OrderLineStatus::Cancelled => "cancelled",
            OrderLineStatus::Returned => "returned",
        }
    }

    /// Учитывается ли строка в недельной выручке продавца
    pub fn counts_as_sale(&self) -> bool {
        matches!(self, OrderLineStatus::Pending | OrderLineStatus::Delivered)
    }
}

impl FromStr for OrderLineStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(OrderLineStatus::Pending),
            "delivered" => Ok(OrderLineStatus::Delivered),
            "cancelled" => Ok(OrderLineStatus::Cancelled),
            "returned" => Ok(OrderLineStatus::Returned),
            other => Err(format!("Unknown order line status: {}", other)),
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Строка заказа маркетплейса: один товар одного продавца
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: OrderLineId,
    pub order_id: String,
    pub seller_id: String,
    pub seller_name: String,
    pub product_id: String,
    pub product_name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub quantity: i64,
    pub unit_price: f64,
    /// Доля комиссии площадки, 0..=1
    pub commission_rate: f64,
    pub status: OrderLineStatus,
    pub ordered_at: DateTime<Utc>,
}

impl OrderLine {
    pub fn new_for_insert(dto: &OrderLineDto) -> Self {
        Self {
            id: OrderLineId::new_v4(),
            order_id: dto.order_id.trim().to_string(),
            seller_id: dto.seller_id.trim().to_string(),
            seller_name: dto.seller_name.trim().to_string(),
            product_id: dto.product_id.trim().to_string(),
            product_name: dto.product_name.trim().to_string(),
            category: dto.category.clone().filter(|c| !c.trim().is_empty()),
            quantity: dto.quantity,
            unit_price: dto.unit_price,
            commission_rate: dto.commission_rate,
            status: dto.status,
            ordered_at: dto.ordered_at,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }

    /// Выручка строки: цена × количество
    pub fn revenue(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }

    /// Комиссия площадки со строки
    pub fn commission(&self) -> f64 {
        self.revenue() * self.commission_rate
    }
}

impl AggregateRoot for OrderLine {
    type Id = OrderLineId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn aggregate_index() -> &'static str {
        "a004"
    }

    fn collection_name() -> &'static str {
        "order_line"
    }

    fn element_name() -> &'static str {
        "Строка заказа"
    }

    fn list_name() -> &'static str {
        "Заказы"
    }
}

// ============================================================================
// DTOs
// ============================================================================

/// Строка заказа для загрузки в систему
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineDto {
    pub order_id: String,
    pub seller_id: String,
    pub seller_name: String,
    pub product_id: String,
    pub product_name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub quantity: i64,
    pub unit_price: f64,
    pub commission_rate: f64,
    #[serde(default)]
    pub status: OrderLineStatus,
    pub ordered_at: DateTime<Utc>,
}

impl OrderLineDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.order_id.trim().is_empty() {
            return Err("Не указан номер заказа".into());
        }
        if self.seller_id.trim().is_empty() {
            return Err("Не указан продавец".into());
        }
        if self.product_id.trim().is_empty() {
            return Err("Не указан товар".into());
        }
        if self.quantity <= 0 {
            return Err("Количество должно быть больше нуля".into());
        }
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            return Err("Цена не может быть отрицательной".into());
        }
        if !(0.0..=1.0).contains(&self.commission_rate) {
            return Err("Комиссия должна быть в диапазоне от 0 до 1".into());
        }
        Ok(())
    }
}

/// Результат загрузки пакета строк заказов
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderImportResult {
    pub inserted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dto() -> OrderLineDto {
        OrderLineDto {
            order_id: "ord-1".into(),
            seller_id: "s-1".into(),
            seller_name: "Anadolu Tekstil".into(),
            product_id: "p-1".into(),
            product_name: "Havlu".into(),
            category: Some("".into()),
            quantity: 3,
            unit_price: 150.0,
            commission_rate: 0.12,
            status: OrderLineStatus::Delivered,
            ordered_at: Utc.with_ymd_and_hms(2025, 1, 7, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_revenue_and_commission() {
        let line = OrderLine::new_for_insert(&dto());
        assert_eq!(line.revenue(), 450.0);
        assert!((line.commission() - 54.0).abs() < 1e-9);
        assert!(line.category.is_none());
    }

    #[test]
    fn test_validation() {
        assert!(dto().validate().is_ok());
        let mut d = dto();
        d.quantity = 0;
        assert!(d.validate().is_err());
        let mut d = dto();
        d.commission_rate = 1.5;
        assert!(d.validate().is_err());
        let mut d = dto();
        d.unit_price = -1.0;
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_only_pending_and_delivered_count() {
        assert!(OrderLineStatus::Delivered.counts_as_sale());
        assert!(OrderLineStatus::Pending.counts_as_sale());
        assert!(!OrderLineStatus::Cancelled.counts_as_sale());
        assert!(!OrderLineStatus::Returned.counts_as_sale());
    }
}
