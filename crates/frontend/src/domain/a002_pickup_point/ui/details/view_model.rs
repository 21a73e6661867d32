use contracts::domain::a002_pickup_point::aggregate::{PickupPoint, PickupPointDto};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a002_pickup_point::api::{
    fetch_pickup_point, save_pickup_point, set_pickup_point_active,
};

/// Разбор координаты из поля ввода; допускается запятая как разделитель
pub fn parse_coordinate(text: &str) -> Option<f64> {
    let normalized = text.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Координаты 0,0 означают "точка ещё не выбрана"
pub fn picked_location(dto: &PickupPointDto) -> Option<(f64, f64)> {
    if dto.lat == 0.0 && dto.lng == 0.0 {
        None
    } else {
        Some((dto.lat, dto.lng))
    }
}

fn optional_text(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[derive(Clone, Copy)]
pub struct PickupPointDetailsViewModel {
    pub form: RwSignal<PickupPointDto>,
    pub error: RwSignal<Option<String>>,
    pub saving: RwSignal<bool>,
    pub saved: RwSignal<bool>,
}

impl PickupPointDetailsViewModel {
    pub fn new() -> Self {
        Self {
            form: RwSignal::new(PickupPointDto::default()),
            error: RwSignal::new(None),
            saving: RwSignal::new(false),
            saved: RwSignal::new(false),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.form.with(|f| f.id.is_some())
    }

    pub fn is_form_valid(&self) -> bool {
        self.form.with(|f| f.validate().is_ok())
    }

    pub fn load_if_needed(&self, id: Option<String>) {
        let Some(existing_id) = id else { return };
        let vm = *self;
        spawn_local(async move {
            match fetch_pickup_point(&existing_id).await {
                Ok(point) => vm.form.set(PickupPointDto::from(&point)),
                Err(e) => vm.error.set(Some(format!("Ошибка загрузки: {}", e))),
            }
        });
    }

    pub fn update(&self, apply: impl FnOnce(&mut PickupPointDto)) {
        self.saved.set(false);
        self.form.update(apply);
    }

    pub fn set_text(&self, field: TextField, value: String) {
        self.update(|f| match field {
            TextField::Name => f.name = value,
            TextField::Address => f.address = value,
            TextField::ContactPhone => f.contact_phone = value,
            TextField::ContactPerson => f.contact_person = optional_text(value),
            TextField::WorkingHours => f.working_hours = optional_text(value),
            TextField::Notes => f.notes = optional_text(value),
        });
    }

    pub fn set_location(&self, lat: f64, lng: f64) {
        self.update(|f| {
            f.lat = lat;
            f.lng = lng;
        });
    }

    /// Валидация на клиенте, затем upsert
    pub fn save_command(&self, on_saved: Callback<PickupPoint>) {
        let current = self.form.get_untracked();
        if let Err(e) = current.validate() {
            self.error.set(Some(e));
            return;
        }

        let vm = *self;
        vm.saving.set(true);
        vm.error.set(None);
        spawn_local(async move {
            match save_pickup_point(&current).await {
                Ok(point) => {
                    vm.form.set(PickupPointDto::from(&point));
                    vm.saved.set(true);
                    on_saved.run(point);
                }
                Err(e) => vm.error.set(Some(e)),
            }
            vm.saving.set(false);
        });
    }

    /// В режиме редактирования активность сохраняется сразу
    pub fn toggle_active_command(&self) {
        let (id, next) = self.form.with_untracked(|f| (f.id.clone(), !f.is_active));
        let Some(id) = id else {
            self.update(|f| f.is_active = next);
            return;
        };

        let vm = *self;
        spawn_local(async move {
            match set_pickup_point_active(&id, next).await {
                Ok(point) => vm.form.update(|f| f.is_active = point.is_active),
                Err(e) => vm.error.set(Some(e)),
            }
        });
    }
}

impl Default for PickupPointDetailsViewModel {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    Address,
    ContactPhone,
    ContactPerson,
    WorkingHours,
    Notes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate(" 55,7558 "), Some(55.7558));
        assert_eq!(parse_coordinate("-37.5"), Some(-37.5));
        assert_eq!(parse_coordinate(""), None);
        assert_eq!(parse_coordinate("abc"), None);
        assert_eq!(parse_coordinate("inf"), None);
    }

    #[test]
    fn test_picked_location() {
        let mut dto = PickupPointDto::default();
        assert_eq!(picked_location(&dto), None);
        dto.lat = 41.01;
        dto.lng = 28.97;
        assert_eq!(picked_location(&dto), Some((41.01, 28.97)));
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text("  ".into()), None);
        assert_eq!(optional_text("10:00-20:00".into()), Some("10:00-20:00".into()));
    }
}
