//! Рассылка изменений коллекций подписчикам `/api/live`.
//!
//! ```text
//! service (insert / update / delete)
//!       │ ChangeEvent
//!       ▼
//! ChangeHub ── broadcast::Sender ──► SSE handler (по одному на вкладку)
//! ```

use contracts::shared::live::{ChangeEvent, ChangeKind, LiveCollection};
use tokio::sync::broadcast;

/// Ёмкость канала; отставший подписчик теряет старые события
const BROADCAST_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct ChangeHub {
    tx: broadcast::Sender<ChangeEvent>,
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { tx }
    }

    pub fn publish(&self, event: ChangeEvent) {
        // Ошибка означает только отсутствие подписчиков
        if self.tx.send(event).is_err() {
            tracing::trace!("No live subscribers");
        }
    }

    pub fn notify(&self, collection: LiveCollection, kind: ChangeKind, id: impl Into<String>) {
        self.publish(ChangeEvent::new(collection, kind, id));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let hub = ChangeHub::new();
        let mut a = hub.subscribe();
        let mut b = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 2);

        hub.notify(LiveCollection::Banner, ChangeKind::Created, "b-1");

        let ev = a.recv().await.unwrap();
        assert_eq!(ev.collection, LiveCollection::Banner);
        assert_eq!(ev.id, "b-1");
        assert_eq!(b.recv().await.unwrap().kind, ChangeKind::Created);
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let hub = ChangeHub::new();
        hub.notify(LiveCollection::Product, ChangeKind::Updated, "p-1");
        assert_eq!(hub.subscriber_count(), 0);
    }
}
