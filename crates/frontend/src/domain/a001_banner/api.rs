use contracts::domain::a001_banner::aggregate::{Banner, BannerKind, BannerLink, BannerLinkDto};
use web_sys::{File, FormData};

use crate::shared::api_utils::{delete, get_json, message, post_form, put_json};

pub async fn fetch_banners(kind: BannerKind) -> Result<Vec<Banner>, String> {
    get_json(&format!("/api/a001/banners?kind={}", kind.as_str()))
        .await
        .map_err(message)
}

/// Загрузка картинки; ссылку можно задать сразу
pub async fn upload_banner(
    kind: BannerKind,
    file: &File,
    link: Option<&BannerLink>,
) -> Result<Banner, String> {
    let form = FormData::new().map_err(|e| format!("{:?}", e))?;
    let append = |name: &str, value: &str| {
        form.append_with_str(name, value)
            .map_err(|e| format!("{:?}", e))
    };
    append("kind", kind.as_str())?;
    if let Some(link) = link {
        append("link_type", link.link_type.as_str())?;
        append("link_id", &link.link_id)?;
        if let Some(name) = &link.link_name {
            append("link_name", name)?;
        }
    }
    form.append_with_blob_and_filename("file", file, &file.name())
        .map_err(|e| format!("{:?}", e))?;

    post_form("/api/a001/banners/upload", form)
        .await
        .map_err(message)
}

pub async fn set_banner_link(id: &str, link: Option<BannerLink>) -> Result<Banner, String> {
    put_json(&format!("/api/a001/banners/{}/link", id), &BannerLinkDto { link })
        .await
        .map_err(message)
}

pub async fn delete_banner(id: &str) -> Result<(), String> {
    delete(&format!("/api/a001/banners/{}", id))
        .await
        .map_err(message)
}
