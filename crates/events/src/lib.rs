//! In-process domain event bus.
//!
//! Booking writes publish here; the notifications module consumes on a
//! background task. Publishing is fire-and-forget: an event nobody is
//! listening for is logged and dropped, never an error for the publisher.

use tokio::sync::broadcast;
use uuid::Uuid;

use venuehub_store::models::BookingStatus;

/// Events crossing module boundaries.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    BookingCreated {
        booking_id: Uuid,
        venue_id: Uuid,
        venue_name: String,
        host_id: Uuid,
        guest_id: Uuid,
    },
    BookingStatusChanged {
        booking_id: Uuid,
        venue_name: String,
        guest_id: Uuid,
        status: BookingStatus,
    },
}

#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: DomainEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("domain event dropped: no active subscribers");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        bus.publish(DomainEvent::BookingStatusChanged {
            booking_id: Uuid::now_v7(),
            venue_name: "Hall".to_string(),
            guest_id: Uuid::now_v7(),
            status: BookingStatus::Confirmed,
        });

        match rx.recv().await.unwrap() {
            DomainEvent::BookingStatusChanged { status, .. } => {
                assert_eq!(status, BookingStatus::Confirmed);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let bus = EventBus::new(8);
        bus.publish(DomainEvent::BookingCreated {
            booking_id: Uuid::now_v7(),
            venue_id: Uuid::now_v7(),
            venue_name: "Hall".to_string(),
            host_id: Uuid::now_v7(),
            guest_id: Uuid::now_v7(),
        });
    }
}
