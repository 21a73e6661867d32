use contracts::domain::a003_archived_product::aggregate::{
    ArchivedProduct, ProductCollection, ProductStats,
};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a003_product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub collection: String,
    pub shop_id: Option<String>,
    pub seller_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub currency: String,
    pub images_json: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub sub_subcategory: Option<String>,
    pub stats_json: String,
    pub is_archived: bool,
    pub archived_at: Option<chrono::DateTime<chrono::Utc>>,
    pub archived_by: Option<String>,
    pub archive_reason: Option<String>,
    pub needs_update: bool,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ArchivedProduct {
    fn from(m: Model) -> Self {
        let collection = m.collection.parse::<ProductCollection>().unwrap_or_else(|e| {
            tracing::warn!("Product {}: {}", m.id, e);
            ProductCollection::default()
        });
        // Повреждённый JSON не должен ронять список
        let images: Vec<String> = serde_json::from_str(&m.images_json).unwrap_or_default();
        let stats: ProductStats = serde_json::from_str(&m.stats_json).unwrap_or_default();

        ArchivedProduct {
            id: m.id,
            collection,
            shop_id: m.shop_id,
            seller_id: m.seller_id.unwrap_or_default(),
            name: m.name,
            description: m.description.unwrap_or_default(),
            price: m.price,
            currency: m.currency,
            images,
            category: m.category,
            subcategory: m.subcategory,
            sub_subcategory: m.sub_subcategory,
            stats,
            is_archived: m.is_archived,
            archived_at: m.archived_at,
            archived_by: m.archived_by,
            archive_reason: m.archive_reason,
            needs_update: m.needs_update,
            updated_at: m.updated_at,
        }
    }
}

fn to_active(p: &ArchivedProduct) -> anyhow::Result<ActiveModel> {
    Ok(ActiveModel {
        id: Set(p.id.clone()),
        collection: Set(p.collection.as_str().to_string()),
        shop_id: Set(p.shop_id.clone()),
        seller_id: Set(Some(p.seller_id.clone())),
        name: Set(p.name.clone()),
        description: Set(Some(p.description.clone())),
        price: Set(p.price),
        currency: Set(p.currency.clone()),
        images_json: Set(serde_json::to_string(&p.images)?),
        category: Set(p.category.clone()),
        subcategory: Set(p.subcategory.clone()),
        sub_subcategory: Set(p.sub_subcategory.clone()),
        stats_json: Set(serde_json::to_string(&p.stats)?),
        is_archived: Set(p.is_archived),
        archived_at: Set(p.archived_at),
        archived_by: Set(p.archived_by.clone()),
        archive_reason: Set(p.archive_reason.clone()),
        needs_update: Set(p.needs_update),
        updated_at: Set(p.updated_at),
    })
}

/// Архивные товары коллекции, последние архивированные сверху
pub async fn list_archived(
    db: &DatabaseConnection,
    collection: ProductCollection,
) -> anyhow::Result<Vec<ArchivedProduct>> {
    let items = Entity::find()
        .filter(Column::Collection.eq(collection.as_str()))
        .filter(Column::IsArchived.eq(true))
        .order_by_desc(Column::ArchivedAt)
        .order_by_asc(Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(db: &DatabaseConnection, id: &str) -> anyhow::Result<Option<ArchivedProduct>> {
    let result = Entity::find_by_id(id.to_string()).one(db).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(db: &DatabaseConnection, product: &ArchivedProduct) -> anyhow::Result<()> {
    to_active(product)?.insert(db).await?;
    Ok(())
}

pub async fn update(db: &DatabaseConnection, product: &ArchivedProduct) -> anyhow::Result<()> {
    to_active(product)?.update(db).await?;
    Ok(())
}
