//! State-change notifications.
//!
//! Review state is read through snapshots; consumers that need to react to
//! changes subscribe via [`EventBus::subscribe`]. Built on
//! [`tokio::sync::broadcast`] so multiple listeners can react independently.

use tokio::sync::broadcast;

use crate::consts::DEFAULT_EVENT_CAPACITY;
use crate::error::{Operation, PlatformError};

/// Something changed in the state of one identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The loading flag flipped.
    LoadingChanged { id: String, loading: bool },
    /// An operation succeeded and replaced the review collection.
    ReviewsUpdated { id: String, operation: Operation },
    /// An operation failed; the error is now in its slot.
    ErrorRecorded {
        id: String,
        operation: Operation,
        error: PlatformError,
    },
    /// State for `id` was reset to its initial value.
    Reset { id: String },
}

impl Event {
    pub fn id(&self) -> &str {
        match self {
            Event::LoadingChanged { id, .. }
            | Event::ReviewsUpdated { id, .. }
            | Event::ErrorRecorded { id, .. }
            | Event::Reset { id } => id,
        }
    }
}

#[derive(Debug)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit an event to all current subscribers.
    /// Returns the number of receivers that will see it.
    pub fn emit(&self, event: Event) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    /// Receives all future events (no replay).
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emit_reaches_every_subscriber() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.emit(Event::Reset {
            id: "p1".to_string(),
        });

        assert_eq!(rx1.recv().await.unwrap().id(), "p1");
        assert_eq!(rx2.recv().await.unwrap().id(), "p1");
    }

    #[test]
    fn emit_without_subscribers_returns_zero() {
        let bus = EventBus::default();
        let count = bus.emit(Event::LoadingChanged {
            id: "p1".to_string(),
            loading: true,
        });
        assert_eq!(count, 0);
    }

    #[test]
    fn id_of_error_event() {
        let event = Event::ErrorRecorded {
            id: "p2".to_string(),
            operation: Operation::AddReview,
            error: PlatformError::network("offline"),
        };
        assert_eq!(event.id(), "p2");
    }
}
