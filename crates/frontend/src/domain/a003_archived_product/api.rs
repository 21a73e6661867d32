use contracts::domain::a003_archived_product::aggregate::{
    ArchiveStatusRequest, ArchiveStatusResponse, ArchivedProduct, ProductCollection,
};
use contracts::shared::api_error::ApiErrorBody;
use contracts::shared::taxonomy::TaxonomyTree;

use crate::shared::api_utils::{get_json, message, post_json};

pub async fn fetch_archived(
    collection: Option<ProductCollection>,
) -> Result<Vec<ArchivedProduct>, String> {
    let path = match collection {
        Some(c) => format!("/api/a003/products/archived?collection={}", c.as_str()),
        None => "/api/a003/products/archived".to_string(),
    };
    get_json(&path).await.map_err(message)
}

pub async fn fetch_taxonomy(locale: &str) -> Result<TaxonomyTree, String> {
    get_json(&format!(
        "/api/taxonomy?locale={}",
        urlencoding::encode(locale)
    ))
    .await
    .map_err(message)
}

/// Текст ошибки восстановления; "не найден" показывается отдельно
pub fn restore_error(error: ApiErrorBody) -> String {
    if error.is_not_found() {
        "Товар не найден: возможно, он уже восстановлен или удалён".to_string()
    } else {
        error.error
    }
}

pub fn archive_status_path(product_id: &str) -> String {
    format!(
        "/api/a003/products/{}/archive-status",
        urlencoding::encode(product_id)
    )
}

/// Снимает товар с архива
pub async fn restore_product(product: &ArchivedProduct) -> Result<ArchiveStatusResponse, String> {
    let request = ArchiveStatusRequest {
        shop_id: product.shop_id.clone(),
        collection: product.collection,
        archived: false,
        reason: None,
    };
    post_json(&archive_status_path(&product.id), &request)
        .await
        .map_err(restore_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::api_error::codes;

    #[test]
    fn test_restore_error_messages() {
        let not_found = ApiErrorBody::new("product p-1 not found", codes::NOT_FOUND);
        assert!(restore_error(not_found).starts_with("Товар не найден"));

        let other = ApiErrorBody::new("database is locked", codes::INTERNAL);
        assert_eq!(restore_error(other), "database is locked");
    }

    #[test]
    fn test_archive_status_path_encodes_id() {
        assert_eq!(
            archive_status_path("p-1"),
            "/api/a003/products/p-1/archive-status"
        );
        assert_eq!(
            archive_status_path("a/b c?"),
            "/api/a003/products/a%2Fb%20c%3F/archive-status"
        );
    }
}
