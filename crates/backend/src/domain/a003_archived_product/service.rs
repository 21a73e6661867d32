use chrono::Utc;
use contracts::domain::a003_archived_product::aggregate::{
    ArchiveStatusRequest, ArchiveStatusResponse, ArchivedProduct, ProductCollection,
};
use contracts::shared::live::{ChangeKind, LiveCollection};

use super::repository;
use crate::shared::error::DomainError;
use crate::shared::state::AppState;

pub async fn list_archived(
    state: &AppState,
    collection: Option<ProductCollection>,
) -> anyhow::Result<Vec<ArchivedProduct>> {
    repository::list_archived(&state.db, collection.unwrap_or_default()).await
}

pub async fn get_by_id(state: &AppState, id: &str) -> anyhow::Result<ArchivedProduct> {
    repository::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("product {}", id)))
}

/// Переключает архив товара от имени `actor`.
///
/// Товар ищется в коллекции из запроса; для товаров магазина ещё и
/// сверяется магазин. Любое несовпадение отвечает как отсутствие товара.
pub async fn set_archive_status(
    state: &AppState,
    id: &str,
    request: ArchiveStatusRequest,
    actor: &str,
) -> anyhow::Result<ArchiveStatusResponse> {
    let mut product = get_by_id(state, id).await?;

    if product.collection != request.collection {
        return Err(DomainError::not_found(format!(
            "product {} in {}",
            id,
            request.collection.as_str()
        )));
    }
    if request.collection == ProductCollection::ShopProducts {
        if let Some(shop_id) = request.shop_id.as_deref().filter(|s| !s.is_empty()) {
            if product.shop_id.as_deref() != Some(shop_id) {
                return Err(DomainError::not_found(format!(
                    "product {} in shop {}",
                    id, shop_id
                )));
            }
        }
    }

    product.apply_archive_status(request.archived, actor, request.reason, Utc::now());
    repository::update(&state.db, &product).await?;

    tracing::info!(
        "Product {} {} by {}",
        id,
        if product.is_archived { "archived" } else { "restored" },
        actor
    );
    state.live.notify(LiveCollection::Product, ChangeKind::Updated, id);

    Ok(ArchiveStatusResponse::from(&product))
}

/// Загрузка товаров из внешней системы: новые вставляются, известные перезаписываются
pub async fn import(state: &AppState, products: Vec<ArchivedProduct>) -> anyhow::Result<usize> {
    for product in &products {
        product
            .validate()
            .map_err(|e| DomainError::validation(format!("Product {}: {}", product.id, e)))?;
    }

    for product in &products {
        if repository::get_by_id(&state.db, &product.id).await?.is_some() {
            repository::update(&state.db, product).await?;
            state.live.notify(LiveCollection::Product, ChangeKind::Updated, product.id.clone());
        } else {
            repository::insert(&state.db, product).await?;
            state.live.notify(LiveCollection::Product, ChangeKind::Created, product.id.clone());
        }
    }
    Ok(products.len())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::shared::error::ApiError;
    use axum::http::StatusCode;
    use contracts::domain::a003_archived_product::aggregate::ProductStats;

    pub(crate) fn product(id: &str, collection: ProductCollection, archived: bool) -> ArchivedProduct {
        ArchivedProduct {
            id: id.into(),
            collection,
            shop_id: Some("shop-7".into()),
            seller_id: "seller-1".into(),
            name: format!("Kilim {}", id),
            description: "Handmade".into(),
            price: 1500.0,
            currency: "TRY".into(),
            images: vec!["https://img/1.jpg".into()],
            category: Some("home_living".into()),
            subcategory: Some("textiles".into()),
            sub_subcategory: Some("carpets".into()),
            stats: ProductStats {
                views: 10,
                ..Default::default()
            },
            is_archived: archived,
            archived_at: archived.then(Utc::now),
            archived_by: archived.then(|| "seller".to_string()),
            archive_reason: None,
            needs_update: archived,
            updated_at: Utc::now(),
        }
    }

    fn restore(collection: ProductCollection, shop_id: Option<&str>) -> ArchiveStatusRequest {
        ArchiveStatusRequest {
            shop_id: shop_id.map(str::to_string),
            collection,
            archived: false,
            reason: None,
        }
    }

    #[tokio::test]
    async fn test_restore_clears_archive_fields() {
        let (_dir, state) = AppState::for_tests().await;
        import(&state, vec![product("p-1", ProductCollection::ShopProducts, true)])
            .await
            .unwrap();
        assert_eq!(list_archived(&state, None).await.unwrap().len(), 1);

        let resp = set_archive_status(
            &state,
            "p-1",
            restore(ProductCollection::ShopProducts, Some("shop-7")),
            "admin",
        )
        .await
        .unwrap();
        assert!(!resp.is_archived);

        let stored = get_by_id(&state, "p-1").await.unwrap();
        assert!(stored.archived_at.is_none());
        assert!(stored.archived_by.is_none());
        assert!(!stored.needs_update);
        assert_eq!(stored.images, vec!["https://img/1.jpg".to_string()]);
        assert_eq!(stored.stats.views, 10);
        assert!(list_archived(&state, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_archive_records_actor_and_reason() {
        let (_dir, state) = AppState::for_tests().await;
        import(&state, vec![product("p-2", ProductCollection::Products, false)])
            .await
            .unwrap();

        let request = ArchiveStatusRequest {
            shop_id: None,
            collection: ProductCollection::Products,
            archived: true,
            reason: Some("counterfeit".into()),
        };
        set_archive_status(&state, "p-2", request, "moderator").await.unwrap();

        let archived = list_archived(&state, Some(ProductCollection::Products)).await.unwrap();
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].archived_by.as_deref(), Some("moderator"));
        assert_eq!(archived[0].archive_reason.as_deref(), Some("counterfeit"));
        assert!(list_archived(&state, Some(ProductCollection::ShopProducts))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_mismatches_are_not_found() {
        let (_dir, state) = AppState::for_tests().await;
        import(&state, vec![product("p-3", ProductCollection::ShopProducts, true)])
            .await
            .unwrap();

        for (id, request) in [
            ("missing", restore(ProductCollection::ShopProducts, None)),
            ("p-3", restore(ProductCollection::Products, None)),
            ("p-3", restore(ProductCollection::ShopProducts, Some("shop-9"))),
        ] {
            let err = set_archive_status(&state, id, request, "admin").await.unwrap_err();
            let err = ApiError::from(err);
            assert_eq!(err.status(), StatusCode::NOT_FOUND);
            assert_eq!(err.body().error, "not found");
            assert_eq!(err.body().code.as_deref(), Some("not_found"));
        }
        assert!(get_by_id(&state, "p-3").await.unwrap().is_archived);
    }

    #[tokio::test]
    async fn test_import_rejects_invalid_batch() {
        let (_dir, state) = AppState::for_tests().await;
        let mut bad = product("p-4", ProductCollection::ShopProducts, true);
        bad.shop_id = None;
        let err = import(&state, vec![product("p-5", ProductCollection::ShopProducts, true), bad])
            .await
            .unwrap_err();
        assert_eq!(ApiError::from(err).status(), StatusCode::BAD_REQUEST);
        assert!(list_archived(&state, None).await.unwrap().is_empty());
    }
}
