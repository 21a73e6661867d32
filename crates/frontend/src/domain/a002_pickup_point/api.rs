use contracts::domain::a002_pickup_point::aggregate::{
    PickupPoint, PickupPointActiveDto, PickupPointDto,
};

use crate::shared::api_utils::{delete, get_json, message, patch_json, post_json};

pub async fn fetch_pickup_points() -> Result<Vec<PickupPoint>, String> {
    get_json("/api/a002/pickup-points").await.map_err(message)
}

pub async fn fetch_pickup_point(id: &str) -> Result<PickupPoint, String> {
    get_json(&format!("/api/a002/pickup-points/{}", id))
        .await
        .map_err(message)
}

/// Создание (без id) или обновление
pub async fn save_pickup_point(dto: &PickupPointDto) -> Result<PickupPoint, String> {
    post_json("/api/a002/pickup-points", dto)
        .await
        .map_err(message)
}

pub async fn set_pickup_point_active(id: &str, is_active: bool) -> Result<PickupPoint, String> {
    patch_json(
        &format!("/api/a002/pickup-points/{}/active", id),
        &PickupPointActiveDto { is_active },
    )
    .await
    .map_err(message)
}

pub async fn delete_pickup_point(id: &str) -> Result<(), String> {
    delete(&format!("/api/a002/pickup-points/{}", id))
        .await
        .map_err(message)
}
