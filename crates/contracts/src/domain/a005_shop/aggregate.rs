use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::AggregateRoot;
use crate::shared::search::Searchable;

/// Магазин продавца
///
/// ID совпадает с идентификатором продавца во внешней системе.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub owner_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Shop {
    pub fn from_dto(dto: &ShopDto) -> Self {
        Self {
            id: dto.id.trim().to_string(),
            name: dto.name.trim().to_string(),
            owner_name: dto.owner_name.clone().filter(|s| !s.trim().is_empty()),
            is_active: dto.is_active,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err("ID магазина не может быть пустым".into());
        }
        if self.name.is_empty() {
            return Err("Название магазина не может быть пустым".into());
        }
        Ok(())
    }
}

impl AggregateRoot for Shop {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }

    fn aggregate_index() -> &'static str {
        "a005"
    }

    fn collection_name() -> &'static str {
        "shop"
    }

    fn element_name() -> &'static str {
        "Магазин"
    }

    fn list_name() -> &'static str {
        "Магазины"
    }
}

impl Searchable for Shop {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.id.as_str(), self.name.as_str()];
        if let Some(owner) = &self.owner_name {
            fields.push(owner.as_str());
        }
        fields
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dto_trims() {
        let dto: ShopDto =
            serde_json::from_str(r#"{"id":" s-1 ","name":" Çiçek Market ","owner_name":""}"#)
                .unwrap();
        let shop = Shop::from_dto(&dto);
        assert_eq!(shop.id, "s-1");
        assert_eq!(shop.name, "Çiçek Market");
        assert!(shop.owner_name.is_none());
        assert!(shop.is_active);
        assert!(shop.validate().is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let dto = ShopDto {
            id: "s-2".into(),
            name: "  ".into(),
            owner_name: None,
            is_active: false,
        };
        assert!(Shop::from_dto(&dto).validate().is_err());
    }
}
