use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::common::{AggregateId, AggregateRoot};
use crate::shared::search::Searchable;

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор баннера
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BannerId(pub Uuid);

impl BannerId {
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

impl AggregateId for BannerId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(BannerId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Вид баннера: главная витрина или верхняя реклама
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerKind {
    Market,
    TopAd,
}

impl BannerKind {
    pub fn all() -> [BannerKind; 2] {
        [BannerKind::Market, BannerKind::TopAd]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BannerKind::Market => "market",
            BannerKind::TopAd => "top_ad",
        }
    }

    /// Каталог в хранилище файлов
    pub fn storage_prefix(&self) -> &'static str {
        match self {
            BannerKind::Market => "market_banners",
            BannerKind::TopAd => "top_ad_banners",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BannerKind::Market => "Баннеры витрины",
            BannerKind::TopAd => "Верхняя реклама",
        }
    }
}

impl FromStr for BannerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "market" => Ok(BannerKind::Market),
            "top_ad" => Ok(BannerKind::TopAd),
            other => Err(format!("Unknown banner kind: {}", other)),
        }
    }
}

/// Куда ведёт клик по баннеру
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerLinkType {
    Product,
    Shop,
    Category,
    Url,
}

impl BannerLinkType {
    pub fn all() -> [BannerLinkType; 4] {
        [
            BannerLinkType::Product,
            BannerLinkType::Shop,
            BannerLinkType::Category,
            BannerLinkType::Url,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BannerLinkType::Product => "product",
            BannerLinkType::Shop => "shop",
            BannerLinkType::Category => "category",
            BannerLinkType::Url => "url",
        }
    }
}

impl FromStr for BannerLinkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "product" => Ok(BannerLinkType::Product),
            "shop" => Ok(BannerLinkType::Shop),
            "category" => Ok(BannerLinkType::Category),
            "url" => Ok(BannerLinkType::Url),
            other => Err(format!("Unknown link type: {}", other)),
        }
    }
}

// ============================================================================
// Value objects
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BannerLink {
    pub link_type: BannerLinkType,
    pub link_id: String,
    #[serde(default)]
    pub link_name: Option<String>,
}

impl BannerLink {
    pub fn validate(&self) -> Result<(), String> {
        let id = self.link_id.trim();
        if id.is_empty() {
            return Err("Не указан объект ссылки".into());
        }
        if self.link_type == BannerLinkType::Url
            && !(id.starts_with("http://") || id.starts_with("https://"))
        {
            return Err("Ссылка должна начинаться с http:// или https://".into());
        }
        Ok(())
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Рекламный баннер
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub id: BannerId,
    pub kind: BannerKind,
    /// Публичный URL картинки
    pub image_url: String,
    /// Путь в хранилище файлов (`market_banners/<millis>_<name>`)
    pub storage_path: String,
    pub created_at: DateTime<Utc>,
    /// Доминирующий цвет `#rrggbb`, заполняется фоновой обработкой
    #[serde(default)]
    pub dominant_color: Option<String>,
    #[serde(default)]
    pub link: Option<BannerLink>,
}

impl Banner {
    /// Создать новый баннер для вставки в БД
    pub fn new_for_insert(
        kind: BannerKind,
        image_url: String,
        storage_path: String,
        link: Option<BannerLink>,
    ) -> Self {
        Self {
            id: BannerId::new_v4(),
            kind,
            image_url,
            storage_path,
            created_at: Utc::now(),
            dominant_color: None,
            link,
        }
    }

    /// Получить ID как строку
    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.storage_path.trim().is_empty() {
            return Err("Не указан путь к файлу баннера".into());
        }
        if !self.storage_path.starts_with(self.kind.storage_prefix()) {
            return Err(format!(
                "Файл баннера должен лежать в {}",
                self.kind.storage_prefix()
            ));
        }
        if let Some(link) = &self.link {
            link.validate()?;
        }
        Ok(())
    }
}

impl AggregateRoot for Banner {
    type Id = BannerId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn aggregate_index() -> &'static str {
        "a001"
    }

    fn collection_name() -> &'static str {
        "banner"
    }

    fn element_name() -> &'static str {
        "Баннер"
    }

    fn list_name() -> &'static str {
        "Баннеры"
    }
}

impl Searchable for Banner {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.storage_path.as_str()];
        if let Some(link) = &self.link {
            fields.push(link.link_id.as_str());
            if let Some(name) = &link.link_name {
                fields.push(name.as_str());
            }
        }
        fields
    }
}

// ============================================================================
// DTOs
// ============================================================================

/// Установка или снятие ссылки баннера
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BannerLinkDto {
    #[serde(default)]
    pub link: Option<BannerLink>,
}

/// Параметры списка баннеров
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BannerListQuery {
    #[serde(default)]
    pub kind: Option<BannerKind>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing_and_prefix() {
        assert_eq!("top_ad".parse::<BannerKind>().unwrap(), BannerKind::TopAd);
        assert_eq!(BannerKind::Market.storage_prefix(), "market_banners");
        assert!("side".parse::<BannerKind>().is_err());
        let json = serde_json::to_string(&BannerKind::TopAd).unwrap();
        assert_eq!(json, "\"top_ad\"");
    }

    #[test]
    fn test_link_validation() {
        let mut link = BannerLink {
            link_type: BannerLinkType::Url,
            link_id: "ftp://example.com".into(),
            link_name: None,
        };
        assert!(link.validate().is_err());
        link.link_id = "https://example.com/sale".into();
        assert!(link.validate().is_ok());
        link.link_type = BannerLinkType::Shop;
        link.link_id = "  ".into();
        assert!(link.validate().is_err());
    }

    #[test]
    fn test_banner_without_link_deserializes() {
        let json = r#"{
            "id": "7f6c1b43-2f0a-4f8e-9a3e-3c2d5b1e0a11",
            "kind": "market",
            "image_url": "/files/market_banners/1_a.png",
            "storage_path": "market_banners/1_a.png",
            "created_at": "2025-01-06T10:00:00Z"
        }"#;
        let banner: Banner = serde_json::from_str(json).unwrap();
        assert!(banner.link.is_none());
        assert!(banner.dominant_color.is_none());
        assert!(banner.validate().is_ok());
    }

    #[test]
    fn test_storage_path_must_match_kind() {
        let banner = Banner::new_for_insert(
            BannerKind::TopAd,
            "/files/market_banners/1_a.png".into(),
            "market_banners/1_a.png".into(),
            None,
        );
        assert!(banner.validate().is_err());
        assert_eq!(Banner::table_name(), "a001_banner");
    }
}
