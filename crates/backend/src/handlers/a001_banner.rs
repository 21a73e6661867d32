use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a001_banner::aggregate::{
    Banner, BannerKind, BannerLink, BannerLinkDto, BannerLinkType, BannerListQuery,
};

use crate::domain::a001_banner::service::{self, BannerUpload};
use crate::shared::error::ApiError;
use crate::shared::state::AppState;

/// GET /api/a001/banners?kind=market|top_ad
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<BannerListQuery>,
) -> Result<Json<Vec<Banner>>, ApiError> {
    Ok(Json(service::list(&state, query.kind).await?))
}

/// GET /api/a001/banners/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Banner>, ApiError> {
    Ok(Json(service::get_by_id(&state, &id).await?))
}

fn bad_multipart(e: impl std::fmt::Display) -> ApiError {
    ApiError::BadRequest(format!("Invalid multipart body: {}", e))
}

/// POST /api/a001/banners/upload
///
/// Поля формы: `file`, `kind`, необязательные `link_type`, `link_id`, `link_name`.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Banner>), ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut kind: Option<String> = None;
    let mut link_type: Option<String> = None;
    let mut link_id: Option<String> = None;
    let mut link_name: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("banner").to_string();
                let data = field.bytes().await.map_err(bad_multipart)?;
                file = Some((filename, data.to_vec()));
            }
            "kind" => kind = Some(field.text().await.map_err(bad_multipart)?),
            "link_type" => link_type = Some(field.text().await.map_err(bad_multipart)?),
            "link_id" => link_id = Some(field.text().await.map_err(bad_multipart)?),
            "link_name" => link_name = Some(field.text().await.map_err(bad_multipart)?),
            other => tracing::debug!("Banner upload: ignoring field {}", other),
        }
    }

    let (filename, data) = file.ok_or_else(|| ApiError::BadRequest("file is required".into()))?;
    let kind = kind
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("kind is required".into()))?
        .parse::<BannerKind>()
        .map_err(ApiError::BadRequest)?;
    let link = parse_link(link_type, link_id, link_name)?;

    let banner = service::upload(
        &state,
        BannerUpload {
            kind,
            filename,
            data,
            link,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(banner)))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Ссылка задаётся только парой тип + id
fn parse_link(
    link_type: Option<String>,
    link_id: Option<String>,
    link_name: Option<String>,
) -> Result<Option<BannerLink>, ApiError> {
    match (non_blank(link_type), non_blank(link_id)) {
        (Some(t), Some(id)) => {
            let link_type = t.parse::<BannerLinkType>().map_err(ApiError::BadRequest)?;
            Ok(Some(BannerLink {
                link_type,
                link_id: id,
                link_name: non_blank(link_name),
            }))
        }
        (None, None) => Ok(None),
        _ => Err(ApiError::BadRequest(
            "link_type and link_id must be set together".into(),
        )),
    }
}

/// PUT /api/a001/banners/:id/link
pub async fn set_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<BannerLinkDto>,
) -> Result<Json<Banner>, ApiError> {
    Ok(Json(service::set_link(&state, &id, dto).await?))
}

/// DELETE /api/a001/banners/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service::delete(&state, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_link() {
        assert!(parse_link(None, None, Some("ignored".into())).unwrap().is_none());
        assert!(parse_link(Some(" ".into()), Some("".into()), None).unwrap().is_none());

        let link = parse_link(Some("shop".into()), Some(" s-1 ".into()), Some("".into()))
            .unwrap()
            .unwrap();
        assert_eq!(link.link_type, BannerLinkType::Shop);
        assert_eq!(link.link_id, "s-1");
        assert!(link.link_name.is_none());

        assert!(parse_link(Some("shop".into()), None, None).is_err());
        assert!(parse_link(Some("planet".into()), Some("x".into()), None).is_err());
    }
}
