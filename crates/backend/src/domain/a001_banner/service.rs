use chrono::Utc;
use contracts::domain::a001_banner::aggregate::{Banner, BannerKind, BannerLink, BannerLinkDto};
use contracts::domain::common::AggregateRoot;
use contracts::shared::live::{ChangeKind, LiveCollection};

use super::repository;
use crate::shared::error::DomainError;
use crate::shared::state::AppState;
use crate::shared::storage::{banner_blob_path, color::dominant_color, validate_image};

/// Загруженный файл с параметрами из формы
pub struct BannerUpload {
    pub kind: BannerKind,
    pub filename: String,
    pub data: Vec<u8>,
    pub link: Option<BannerLink>,
}

pub async fn list(state: &AppState, kind: Option<BannerKind>) -> anyhow::Result<Vec<Banner>> {
    repository::list(&state.db, kind).await
}

pub async fn get_by_id(state: &AppState, id: &str) -> anyhow::Result<Banner> {
    repository::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| DomainError::not_found(Banner::record_ref(id)))
}

/// Сохраняет файл и документ баннера. Цвет фона считается в фоне.
pub async fn upload(state: &AppState, upload: BannerUpload) -> anyhow::Result<Banner> {
    validate_image(&upload.data, &upload.filename).map_err(DomainError::validation)?;

    let path = banner_blob_path(upload.kind, &upload.filename, Utc::now().timestamp_millis());
    let image_url = state.storage.public_url(&path);
    let banner = Banner::new_for_insert(upload.kind, image_url, path.clone(), upload.link);
    banner
        .validate()
        .map_err(|e| DomainError::validation(format!("Validation failed: {}", e)))?;

    state.storage.put(&path, &upload.data).await?;
    if let Err(e) = repository::insert(&state.db, &banner).await {
        // Файл без документа никому не нужен
        if let Err(cleanup) = state.storage.delete(&path).await {
            tracing::warn!("Failed to remove orphan blob {}: {}", path, cleanup);
        }
        return Err(e);
    }

    let id = banner.to_string_id();
    tracing::info!("Banner {} uploaded to {}", id, path);
    state.live.notify(LiveCollection::Banner, ChangeKind::Created, id.clone());

    let task_state = state.clone();
    let data = upload.data;
    tokio::spawn(async move {
        if let Err(e) = apply_dominant_color(&task_state, &id, data).await {
            tracing::warn!("Dominant color for banner {} not computed: {}", id, e);
        }
    });

    Ok(banner)
}

/// Считает средний цвет картинки и записывает его в документ баннера
pub async fn apply_dominant_color(state: &AppState, id: &str, data: Vec<u8>) -> anyhow::Result<String> {
    let color = tokio::task::spawn_blocking(move || dominant_color(&data)).await??;
    if repository::set_dominant_color(&state.db, id, &color).await? {
        state.live.notify(LiveCollection::Banner, ChangeKind::Updated, id);
    } else {
        tracing::debug!("Banner {} deleted before color was ready", id);
    }
    Ok(color)
}

pub async fn set_link(state: &AppState, id: &str, dto: BannerLinkDto) -> anyhow::Result<Banner> {
    if let Some(link) = &dto.link {
        link.validate()
            .map_err(|e| DomainError::validation(format!("Validation failed: {}", e)))?;
    }
    if !repository::update_link(&state.db, id, dto.link.as_ref()).await? {
        return Err(DomainError::not_found(Banner::record_ref(id)));
    }
    state.live.notify(LiveCollection::Banner, ChangeKind::Updated, id);
    get_by_id(state, id).await
}

/// Удаляет документ, затем файл. Отсутствие файла не ошибка.
pub async fn delete(state: &AppState, id: &str) -> anyhow::Result<()> {
    let banner = get_by_id(state, id).await?;
    repository::delete(&state.db, id).await?;

    match state.storage.delete(&banner.storage_path).await {
        Ok(true) => {}
        Ok(false) => tracing::warn!("Banner {} blob already missing: {}", id, banner.storage_path),
        Err(e) => tracing::warn!("Failed to delete banner {} blob: {}", id, e),
    }

    state.live.notify(LiveCollection::Banner, ChangeKind::Deleted, id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::ApiError;
    use crate::shared::storage::tests::png_bytes;
    use axum::http::StatusCode;
    use contracts::domain::a001_banner::aggregate::BannerLinkType;

    fn upload_of(kind: BannerKind, data: Vec<u8>) -> BannerUpload {
        BannerUpload {
            kind,
            filename: "Spring Sale.png".to_string(),
            data,
            link: None,
        }
    }

    #[tokio::test]
    async fn test_upload_list_and_delete() {
        let (_dir, state) = AppState::for_tests().await;
        let mut events = state.live.subscribe();

        let banner = upload(&state, upload_of(BannerKind::TopAd, png_bytes(8, 8, [0, 0, 255, 255])))
            .await
            .unwrap();
        assert!(banner.storage_path.starts_with("top_ad_banners/"));
        assert!(banner.storage_path.ends_with("_Spring_Sale.png"));
        assert_eq!(banner.image_url, format!("/files/{}", banner.storage_path));
        assert_eq!(events.recv().await.unwrap().kind, ChangeKind::Created);

        let top = list(&state, Some(BannerKind::TopAd)).await.unwrap();
        assert_eq!(top.len(), 1);
        assert!(list(&state, Some(BannerKind::Market)).await.unwrap().is_empty());

        let id = banner.to_string_id();
        delete(&state, &id).await.unwrap();
        assert!(list(&state, None).await.unwrap().is_empty());
        assert!(state.storage.read(&banner.storage_path).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_with_missing_blob_succeeds() {
        let (_dir, state) = AppState::for_tests().await;
        let banner = upload(&state, upload_of(BannerKind::Market, png_bytes(4, 4, [1, 2, 3, 255])))
            .await
            .unwrap();
        state.storage.delete(&banner.storage_path).await.unwrap();

        delete(&state, &banner.to_string_id()).await.unwrap();
        let err = ApiError::from(delete(&state, &banner.to_string_id()).await.unwrap_err());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_image_is_rejected() {
        let (_dir, state) = AppState::for_tests().await;
        let err = upload(&state, upload_of(BannerKind::Market, b"not png".to_vec()))
            .await
            .unwrap_err();
        assert_eq!(ApiError::from(err).status(), StatusCode::BAD_REQUEST);
        assert!(list(&state, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dominant_color_is_stored() {
        let (_dir, state) = AppState::for_tests().await;
        let data = png_bytes(16, 16, [255, 0, 0, 255]);
        let banner = upload(&state, upload_of(BannerKind::Market, data.clone()))
            .await
            .unwrap();
        let id = banner.to_string_id();

        let color = apply_dominant_color(&state, &id, data).await.unwrap();
        assert_eq!(color, "#ff0000");
        let stored = get_by_id(&state, &id).await.unwrap();
        assert_eq!(stored.dominant_color.as_deref(), Some("#ff0000"));
    }

    #[tokio::test]
    async fn test_set_and_clear_link() {
        let (_dir, state) = AppState::for_tests().await;
        let banner = upload(&state, upload_of(BannerKind::Market, png_bytes(4, 4, [9, 9, 9, 255])))
            .await
            .unwrap();
        let id = banner.to_string_id();

        let link = BannerLink {
            link_type: BannerLinkType::Shop,
            link_id: "shop-7".into(),
            link_name: Some("Anadolu".into()),
        };
        let updated = set_link(&state, &id, BannerLinkDto { link: Some(link.clone()) })
            .await
            .unwrap();
        assert_eq!(updated.link, Some(link));

        let cleared = set_link(&state, &id, BannerLinkDto { link: None }).await.unwrap();
        assert!(cleared.link.is_none());

        let bad = BannerLink {
            link_type: BannerLinkType::Url,
            link_id: "ftp://x".into(),
            link_name: None,
        };
        let err = set_link(&state, &id, BannerLinkDto { link: Some(bad) }).await.unwrap_err();
        assert_eq!(ApiError::from(err).status(), StatusCode::BAD_REQUEST);

        let err = set_link(&state, "missing", BannerLinkDto { link: None }).await.unwrap_err();
        assert_eq!(ApiError::from(err).status(), StatusCode::NOT_FOUND);
    }
}
