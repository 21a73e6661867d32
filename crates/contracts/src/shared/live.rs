//! События live-подписок на изменения коллекций.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Имя SSE-события с изменением
pub const CHANGE_EVENT_NAME: &str = "change";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiveCollection {
    Banner,
    PickupPoint,
    Product,
    WeeklyReport,
}

impl LiveCollection {
    pub fn as_str(&self) -> &'static str {
        match self {
            LiveCollection::Banner => "banner",
            LiveCollection::PickupPoint => "pickup_point",
            LiveCollection::Product => "product",
            LiveCollection::WeeklyReport => "weekly_report",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub collection: LiveCollection,
    pub kind: ChangeKind,
    pub id: String,
    pub at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(collection: LiveCollection, kind: ChangeKind, id: impl Into<String>) -> Self {
        Self {
            collection,
            kind,
            id: id.into(),
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event = ChangeEvent::new(LiveCollection::PickupPoint, ChangeKind::Deleted, "42");
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["collection"], "pickup_point");
        assert_eq!(value["kind"], "deleted");
        assert_eq!(value["id"], "42");
    }
}
