use contracts::domain::a005_shop::aggregate::{Shop, ShopDto};

use super::repository;
use crate::shared::error::DomainError;
use crate::shared::state::AppState;

pub async fn list_all(state: &AppState) -> anyhow::Result<Vec<Shop>> {
    repository::list_all(&state.db).await
}

/// Создаёт магазин или переименовывает существующий
pub async fn upsert(state: &AppState, dto: ShopDto) -> anyhow::Result<Shop> {
    let shop = Shop::from_dto(&dto);
    shop.validate()
        .map_err(|e| DomainError::validation(format!("Validation failed: {}", e)))?;

    match repository::get_by_id(&state.db, &shop.id).await? {
        Some(existing) => {
            let updated = Shop {
                created_at: existing.created_at,
                ..shop
            };
            repository::update(&state.db, &updated).await?;
            Ok(updated)
        }
        None => {
            repository::insert(&state.db, &shop).await?;
            Ok(shop)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(id: &str, name: &str) -> ShopDto {
        ShopDto {
            id: id.into(),
            name: name.into(),
            owner_name: None,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_upsert_renames() {
        let (_dir, state) = AppState::for_tests().await;
        upsert(&state, dto("s-1", "Anadolu")).await.unwrap();
        upsert(&state, dto("s-1", "Anadolu Home")).await.unwrap();
        upsert(&state, dto("s-2", "Bosphorus")).await.unwrap();

        let shops = list_all(&state).await.unwrap();
        assert_eq!(shops.len(), 2);
        assert_eq!(shops[0].name, "Anadolu Home");

        let names = repository::names(&state.db).await.unwrap();
        assert_eq!(names.get("s-2").map(String::as_str), Some("Bosphorus"));
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let (_dir, state) = AppState::for_tests().await;
        assert!(upsert(&state, dto("s-1", "  ")).await.is_err());
    }
}
