use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{AggregateId, AggregateRoot};
use crate::shared::search::Searchable;

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор пункта выдачи
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PickupPointId(pub Uuid);

impl PickupPointId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for PickupPointId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(PickupPointId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Пункт выдачи заказов
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupPoint {
    pub id: PickupPointId,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub contact_person: Option<String>,
    pub contact_phone: String,
    #[serde(default)]
    pub working_hours: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PickupPoint {
    /// Создать новый пункт выдачи для вставки в БД
    pub fn new_for_insert(dto: &PickupPointDto) -> Self {
        let now = Utc::now();
        let mut point = Self {
            id: PickupPointId::new_v4(),
            name: String::new(),
            address: String::new(),
            lat: 0.0,
            lng: 0.0,
            contact_person: None,
            contact_phone: String::new(),
            working_hours: None,
            is_active: true,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        point.update(dto);
        point
    }

    /// Получить ID как строку
    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }

    /// Обновить данные из DTO
    pub fn update(&mut self, dto: &PickupPointDto) {
        self.name = dto.name.trim().to_string();
        self.address = dto.address.trim().to_string();
        self.lat = dto.lat;
        self.lng = dto.lng;
        self.contact_person = non_blank(&dto.contact_person);
        self.contact_phone = dto.contact_phone.trim().to_string();
        self.working_hours = non_blank(&dto.working_hours);
        self.is_active = dto.is_active;
        self.notes = non_blank(&dto.notes);
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        validate_fields(&self.name, &self.address, &self.contact_phone, self.lat, self.lng)
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Есть ли у точки осмысленные координаты (0,0 считается "не задано")
    pub fn has_location(&self) -> bool {
        !(self.lat == 0.0 && self.lng == 0.0)
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn validate_fields(name: &str, address: &str, phone: &str, lat: f64, lng: f64) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Название не может быть пустым".into());
    }
    if address.trim().is_empty() {
        return Err("Адрес не может быть пустым".into());
    }
    if phone.trim().is_empty() {
        return Err("Телефон не может быть пустым".into());
    }
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err("Широта должна быть в диапазоне от -90 до 90".into());
    }
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err("Долгота должна быть в диапазоне от -180 до 180".into());
    }
    Ok(())
}

impl AggregateRoot for PickupPoint {
    type Id = PickupPointId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn aggregate_index() -> &'static str {
        "a002"
    }

    fn collection_name() -> &'static str {
        "pickup_point"
    }

    fn element_name() -> &'static str {
        "Пункт выдачи"
    }

    fn list_name() -> &'static str {
        "Пункты выдачи"
    }
}

impl Searchable for PickupPoint {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.name.as_str(),
            self.address.as_str(),
            self.contact_phone.as_str(),
        ];
        if let Some(person) = &self.contact_person {
            fields.push(person.as_str());
        }
        fields
    }
}

// ============================================================================
// DTOs
// ============================================================================

/// Форма пункта выдачи: без `id` создаёт новую запись, с `id` обновляет
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupPointDto {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub contact_person: Option<String>,
    pub contact_phone: String,
    #[serde(default)]
    pub working_hours: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_active() -> bool {
    true
}

impl Default for PickupPointDto {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            address: String::new(),
            lat: 0.0,
            lng: 0.0,
            contact_person: None,
            contact_phone: String::new(),
            working_hours: None,
            is_active: true,
            notes: None,
        }
    }
}

impl PickupPointDto {
    /// Та же проверка, что и у агрегата: форма валидирует до отправки
    pub fn validate(&self) -> Result<(), String> {
        validate_fields(&self.name, &self.address, &self.contact_phone, self.lat, self.lng)
    }
}

impl From<&PickupPoint> for PickupPointDto {
    fn from(point: &PickupPoint) -> Self {
        Self {
            id: Some(point.to_string_id()),
            name: point.name.clone(),
            address: point.address.clone(),
            lat: point.lat,
            lng: point.lng,
            contact_person: point.contact_person.clone(),
            contact_phone: point.contact_phone.clone(),
            working_hours: point.working_hours.clone(),
            is_active: point.is_active,
            notes: point.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupPointActiveDto {
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> PickupPointDto {
        PickupPointDto {
            name: "Kadıköy".into(),
            address: "Moda Cd. 12, İstanbul".into(),
            lat: 40.987,
            lng: 29.026,
            contact_phone: "+90 216 000 00 00".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_dto() {
        assert!(dto().validate().is_ok());
    }

    #[test]
    fn test_required_fields() {
        let mut d = dto();
        d.name = "   ".into();
        assert!(d.validate().is_err());

        let mut d = dto();
        d.address.clear();
        assert!(d.validate().is_err());

        let mut d = dto();
        d.contact_phone.clear();
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_coordinate_ranges() {
        let mut d = dto();
        d.lat = 90.0;
        d.lng = -180.0;
        assert!(d.validate().is_ok());
        d.lat = 90.0001;
        assert!(d.validate().is_err());
        d.lat = 0.0;
        d.lng = 181.0;
        assert!(d.validate().is_err());
        d.lng = f64::NAN;
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_update_trims_and_drops_blank_optionals() {
        let mut d = dto();
        d.contact_person = Some("  ".into());
        d.notes = Some(" вход со двора ".into());
        d.name = "  Moda  ".into();
        let point = PickupPoint::new_for_insert(&d);
        assert_eq!(point.name, "Moda");
        assert!(point.contact_person.is_none());
        assert_eq!(point.notes.as_deref(), Some("вход со двора"));
        assert!(point.is_active);
        assert!(point.has_location());
    }

    #[test]
    fn test_search_fields() {
        let point = PickupPoint::new_for_insert(&dto());
        assert!(point.matches_search("moda"));
        assert!(point.matches_search("216"));
        assert!(!point.matches_search("ankara"));
    }
}
