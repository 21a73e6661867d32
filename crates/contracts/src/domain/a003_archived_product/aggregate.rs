use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::common::AggregateRoot;
use crate::shared::search::Searchable;

// ============================================================================
// Enums
// ============================================================================

/// Коллекция, в которой хранится товар
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductCollection {
    /// Товары магазинов продавцов
    #[default]
    ShopProducts,
    /// Товары без магазина (каталог площадки)
    Products,
}

impl ProductCollection {
    pub fn all() -> [ProductCollection; 2] {
        [ProductCollection::ShopProducts, ProductCollection::Products]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCollection::ShopProducts => "shop_products",
            ProductCollection::Products => "products",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProductCollection::ShopProducts => "Товары магазинов",
            ProductCollection::Products => "Товары каталога",
        }
    }
}

impl FromStr for ProductCollection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "shop_products" => Ok(ProductCollection::ShopProducts),
            "products" => Ok(ProductCollection::Products),
            other => Err(format!("Unknown product collection: {}", other)),
        }
    }
}

// ============================================================================
// Value objects
// ============================================================================

/// Счётчики активности покупателей по товару
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductStats {
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub favorites: i64,
    #[serde(default)]
    pub cart_adds: i64,
    #[serde(default)]
    pub sales: i64,
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Товар (в том числе архивный)
///
/// ID приходит из внешней системы, поэтому хранится строкой.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedProduct {
    pub id: String,
    pub collection: ProductCollection,
    #[serde(default)]
    pub shop_id: Option<String>,
    pub seller_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub sub_subcategory: Option<String>,
    #[serde(default)]
    pub stats: ProductStats,
    pub is_archived: bool,
    #[serde(default)]
    pub archived_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub archived_by: Option<String>,
    #[serde(default)]
    pub archive_reason: Option<String>,
    /// Продавцу нужно обновить карточку после восстановления
    #[serde(default)]
    pub needs_update: bool,
    pub updated_at: DateTime<Utc>,
}

impl ArchivedProduct {
    /// Применить переключатель архива.
    ///
    /// При архивации фиксируются кто/когда/почему, при восстановлении
    /// эти поля очищаются и снимается `needs_update`. Повторная установка
    /// того же значения меняет только `updated_at`.
    pub fn apply_archive_status(
        &mut self,
        archived: bool,
        actor: &str,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) {
        if archived {
            if !self.is_archived {
                self.archived_at = Some(now);
                self.archived_by = Some(actor.to_string());
                self.archive_reason = reason.filter(|r| !r.trim().is_empty());
            }
            self.is_archived = true;
        } else {
            self.is_archived = false;
            self.archived_at = None;
            self.archived_by = None;
            self.archive_reason = None;
            self.needs_update = false;
        }
        self.updated_at = now;
    }

    /// Первая картинка товара для превью
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("ID товара не может быть пустым".into());
        }
        if self.name.trim().is_empty() {
            return Err("Наименование не может быть пустым".into());
        }
        if self.seller_id.trim().is_empty() {
            return Err("Не указан продавец".into());
        }
        if self.collection == ProductCollection::ShopProducts
            && self.shop_id.as_deref().map_or(true, |s| s.trim().is_empty())
        {
            return Err("Для товара магазина обязателен shop_id".into());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err("Цена не может быть отрицательной".into());
        }
        Ok(())
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl AggregateRoot for ArchivedProduct {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }

    fn aggregate_index() -> &'static str {
        "a003"
    }

    fn collection_name() -> &'static str {
        "product"
    }

    fn element_name() -> &'static str {
        "Товар"
    }

    fn list_name() -> &'static str {
        "Архив товаров"
    }
}

impl Searchable for ArchivedProduct {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.id.as_str(), self.seller_id.as_str()];
        if let Some(shop_id) = &self.shop_id {
            fields.push(shop_id.as_str());
        }
        fields
    }
}

// ============================================================================
// DTOs
// ============================================================================

/// Запрос переключения архива
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveStatusRequest {
    #[serde(default)]
    pub shop_id: Option<String>,
    pub collection: ProductCollection,
    pub archived: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveStatusResponse {
    pub id: String,
    pub is_archived: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<&ArchivedProduct> for ArchiveStatusResponse {
    fn from(product: &ArchivedProduct) -> Self {
        Self {
            id: product.id.clone(),
            is_archived: product.is_archived,
            updated_at: product.updated_at,
        }
    }
}

/// Параметры списка архивных товаров
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchivedListQuery {
    #[serde(default)]
    pub collection: Option<ProductCollection>,
}
