use anyhow::Context;
use contracts::domain::a001_banner::aggregate::{Banner, BannerId, BannerKind, BannerLink};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_banner")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub image_url: String,
    pub storage_path: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub dominant_color: Option<String>,
    pub link_type: Option<String>,
    pub link_id: Option<String>,
    pub link_name: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Banner {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&m.id).with_context(|| format!("Bad banner id {}", m.id))?;
        let kind: BannerKind = m.kind.parse().map_err(anyhow::Error::msg)?;
        // Ссылка есть, только если заданы и тип, и идентификатор
        let link = match (m.link_type, m.link_id) {
            (Some(link_type), Some(link_id)) => Some(BannerLink {
                link_type: link_type.parse().map_err(anyhow::Error::msg)?,
                link_id,
                link_name: m.link_name,
            }),
            _ => None,
        };
        Ok(Banner {
            id: BannerId(id),
            kind,
            image_url: m.image_url,
            storage_path: m.storage_path,
            created_at: m.created_at,
            dominant_color: m.dominant_color,
            link,
        })
    }
}

fn link_columns(link: Option<&BannerLink>) -> (Option<String>, Option<String>, Option<String>) {
    match link {
        Some(l) => (
            Some(l.link_type.as_str().to_string()),
            Some(l.link_id.clone()),
            l.link_name.clone(),
        ),
        None => (None, None, None),
    }
}

fn to_aggregates(models: Vec<Model>) -> anyhow::Result<Vec<Banner>> {
    models.into_iter().map(Banner::try_from).collect()
}

/// Баннеры, новые сверху
pub async fn list(db: &DatabaseConnection, kind: Option<BannerKind>) -> anyhow::Result<Vec<Banner>> {
    let mut query = Entity::find();
    if let Some(kind) = kind {
        query = query.filter(Column::Kind.eq(kind.as_str()));
    }
    let models = query
        .order_by_desc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .all(db)
        .await?;
    to_aggregates(models)
}

pub async fn get_by_id(db: &DatabaseConnection, id: &str) -> anyhow::Result<Option<Banner>> {
    Entity::find_by_id(id.to_string())
        .one(db)
        .await?
        .map(Banner::try_from)
        .transpose()
}

pub async fn insert(db: &DatabaseConnection, banner: &Banner) -> anyhow::Result<()> {
    let (link_type, link_id, link_name) = link_columns(banner.link.as_ref());
    let active = ActiveModel {
        id: Set(banner.to_string_id()),
        kind: Set(banner.kind.as_str().to_string()),
        image_url: Set(banner.image_url.clone()),
        storage_path: Set(banner.storage_path.clone()),
        created_at: Set(banner.created_at),
        dominant_color: Set(banner.dominant_color.clone()),
        link_type: Set(link_type),
        link_id: Set(link_id),
        link_name: Set(link_name),
    };
    active.insert(db).await?;
    Ok(())
}

/// Меняет только ссылку. `false`, если баннера нет.
pub async fn update_link(
    db: &DatabaseConnection,
    id: &str,
    link: Option<&BannerLink>,
) -> anyhow::Result<bool> {
    use sea_orm::sea_query::Expr;
    let (link_type, link_id, link_name) = link_columns(link);
    let result = Entity::update_many()
        .col_expr(Column::LinkType, Expr::value(link_type))
        .col_expr(Column::LinkId, Expr::value(link_id))
        .col_expr(Column::LinkName, Expr::value(link_name))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn set_dominant_color(db: &DatabaseConnection, id: &str, color: &str) -> anyhow::Result<bool> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::DominantColor, Expr::value(color.to_string()))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn delete(db: &DatabaseConnection, id: &str) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(db).await?;
    Ok(result.rows_affected > 0)
}
