use contracts::domain::a002_pickup_point::aggregate::{PickupPoint, PickupPointDto};
use contracts::domain::common::AggregateRoot;
use contracts::shared::live::{ChangeKind, LiveCollection};

use super::repository;
use crate::shared::error::DomainError;
use crate::shared::state::AppState;

pub async fn list_all(state: &AppState) -> anyhow::Result<Vec<PickupPoint>> {
    repository::list_all(&state.db).await
}

pub async fn get_by_id(state: &AppState, id: &str) -> anyhow::Result<PickupPoint> {
    repository::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| DomainError::not_found(PickupPoint::record_ref(id)))
}

pub async fn create(state: &AppState, dto: PickupPointDto) -> anyhow::Result<PickupPoint> {
    let mut aggregate = PickupPoint::new_for_insert(&dto);

    aggregate
        .validate()
        .map_err(|e| DomainError::validation(format!("Validation failed: {}", e)))?;
    aggregate.before_write();

    let id = repository::insert(&state.db, &aggregate).await?;
    state.live.notify(LiveCollection::PickupPoint, ChangeKind::Created, id);
    Ok(aggregate)
}

pub async fn update(state: &AppState, id: &str, dto: PickupPointDto) -> anyhow::Result<PickupPoint> {
    let mut aggregate = get_by_id(state, id).await?;
    aggregate.update(&dto);

    aggregate
        .validate()
        .map_err(|e| DomainError::validation(format!("Validation failed: {}", e)))?;
    aggregate.before_write();

    repository::update(&state.db, &aggregate).await?;
    state.live.notify(LiveCollection::PickupPoint, ChangeKind::Updated, id);
    Ok(aggregate)
}

/// Форма без `id` создаёт пункт, с `id` обновляет
pub async fn upsert(state: &AppState, dto: PickupPointDto) -> anyhow::Result<PickupPoint> {
    match dto.id.clone().filter(|id| !id.trim().is_empty()) {
        Some(id) => update(state, &id, dto).await,
        None => create(state, dto).await,
    }
}

pub async fn set_active(state: &AppState, id: &str, is_active: bool) -> anyhow::Result<PickupPoint> {
    if !repository::set_active(&state.db, id, is_active).await? {
        return Err(DomainError::not_found(PickupPoint::record_ref(id)));
    }
    state.live.notify(LiveCollection::PickupPoint, ChangeKind::Updated, id);
    get_by_id(state, id).await
}

pub async fn delete(state: &AppState, id: &str) -> anyhow::Result<()> {
    if !repository::delete(&state.db, id).await? {
        return Err(DomainError::not_found(PickupPoint::record_ref(id)));
    }
    state.live.notify(LiveCollection::PickupPoint, ChangeKind::Deleted, id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::ApiError;
    use axum::http::StatusCode;

    fn dto(name: &str) -> PickupPointDto {
        PickupPointDto {
            name: name.to_string(),
            address: " Istiklal Cd. 12, Istanbul ".to_string(),
            lat: 41.0342,
            lng: 28.9786,
            contact_phone: "+90 555 000 00 00".to_string(),
            contact_person: Some("  ".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_update_toggle_delete() {
        let (_dir, state) = AppState::for_tests().await;

        let created = create(&state, dto("Beyoğlu")).await.unwrap();
        let id = created.to_string_id();
        assert_eq!(created.address, "Istiklal Cd. 12, Istanbul");
        assert!(created.contact_person.is_none());
        assert!(created.is_active);

        let mut changes = PickupPointDto::from(&created);
        changes.name = "Beyoğlu 2".to_string();
        changes.working_hours = Some("09:00-21:00".to_string());
        let updated = upsert(&state, changes).await.unwrap();
        assert_eq!(updated.name, "Beyoğlu 2");
        assert_eq!(updated.to_string_id(), id);

        let toggled = set_active(&state, &id, false).await.unwrap();
        assert!(!toggled.is_active);

        assert_eq!(list_all(&state).await.unwrap().len(), 1);
        delete(&state, &id).await.unwrap();
        assert!(list_all(&state).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_validation_and_not_found() {
        let (_dir, state) = AppState::for_tests().await;

        let mut bad = dto("Kadıköy");
        bad.lat = 123.0;
        let err = ApiError::from(create(&state, bad).await.unwrap_err());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(set_active(&state, "nope", true).await.unwrap_err());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        let err = ApiError::from(delete(&state, "nope").await.unwrap_err());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let (_dir, state) = AppState::for_tests().await;
        create(&state, dto("Üsküdar")).await.unwrap();
        create(&state, dto("Ataşehir")).await.unwrap();
        let names: Vec<String> = list_all(&state).await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Ataşehir", "Üsküdar"]);
    }
}
