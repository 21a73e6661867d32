use contracts::domain::a005_shop::aggregate::Shop;
use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a005_shop")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub owner_name: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Shop {
    fn from(m: Model) -> Self {
        Shop {
            id: m.id,
            name: m.name,
            owner_name: m.owner_name,
            is_active: m.is_active,
            created_at: m.created_at,
        }
    }
}

pub async fn list_all(db: &DatabaseConnection) -> anyhow::Result<Vec<Shop>> {
    let items = Entity::find()
        .order_by_asc(Column::Name)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// id магазина → название
pub async fn names(db: &DatabaseConnection) -> anyhow::Result<HashMap<String, String>> {
    let shops = Entity::find().all(db).await?;
    Ok(shops.into_iter().map(|m| (m.id, m.name)).collect())
}

pub async fn get_by_id(db: &DatabaseConnection, id: &str) -> anyhow::Result<Option<Shop>> {
    let result = Entity::find_by_id(id.to_string()).one(db).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(db: &DatabaseConnection, shop: &Shop) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(shop.id.clone()),
        name: Set(shop.name.clone()),
        owner_name: Set(shop.owner_name.clone()),
        is_active: Set(shop.is_active),
        created_at: Set(shop.created_at),
    };
    active.insert(db).await?;
    Ok(())
}

pub async fn update(db: &DatabaseConnection, shop: &Shop) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(shop.id.clone()),
        name: Set(shop.name.clone()),
        owner_name: Set(shop.owner_name.clone()),
        is_active: Set(shop.is_active),
        created_at: sea_orm::ActiveValue::NotSet,
    };
    active.update(db).await?;
    Ok(())
}
