use contracts::domain::a002_pickup_point::aggregate::{PickupPoint, PickupPointId};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_pickup_point")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub contact_person: Option<String>,
    pub contact_phone: String,
    pub working_hours: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PickupPoint {
    fn from(m: Model) -> Self {
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        PickupPoint {
            id: PickupPointId(uuid),
            name: m.name,
            address: m.address,
            lat: m.lat,
            lng: m.lng,
            contact_person: m.contact_person,
            contact_phone: m.contact_phone,
            working_hours: m.working_hours,
            is_active: m.is_active,
            notes: m.notes,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn to_active(point: &PickupPoint) -> ActiveModel {
    ActiveModel {
        id: Set(point.to_string_id()),
        name: Set(point.name.clone()),
        address: Set(point.address.clone()),
        lat: Set(point.lat),
        lng: Set(point.lng),
        contact_person: Set(point.contact_person.clone()),
        contact_phone: Set(point.contact_phone.clone()),
        working_hours: Set(point.working_hours.clone()),
        notes: Set(point.notes.clone()),
        is_active: Set(point.is_active),
        created_at: Set(point.created_at),
        updated_at: Set(point.updated_at),
    }
}

/// Все пункты по названию
pub async fn list_all(db: &DatabaseConnection) -> anyhow::Result<Vec<PickupPoint>> {
    let items = Entity::find()
        .order_by_asc(Column::Name)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(db: &DatabaseConnection, id: &str) -> anyhow::Result<Option<PickupPoint>> {
    let result = Entity::find_by_id(id.to_string()).one(db).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(db: &DatabaseConnection, point: &PickupPoint) -> anyhow::Result<String> {
    to_active(point).insert(db).await?;
    Ok(point.to_string_id())
}

pub async fn update(db: &DatabaseConnection, point: &PickupPoint) -> anyhow::Result<()> {
    let mut active = to_active(point);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(db).await?;
    Ok(())
}

pub async fn set_active(db: &DatabaseConnection, id: &str, is_active: bool) -> anyhow::Result<bool> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::IsActive, Expr::value(is_active))
        .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn delete(db: &DatabaseConnection, id: &str) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(db).await?;
    Ok(result.rows_affected > 0)
}
