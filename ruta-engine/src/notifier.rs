use ruta_domain::events::SeatEvent;
use tokio::sync::broadcast;
use tracing::debug;

/// Fan-out of seat-state changes to connected trip viewers. Pure
/// best-effort: never a source of truth, and a publish failure never fails
/// the state transition behind it.
#[derive(Clone)]
pub struct SeatNotifier {
    tx: broadcast::Sender<SeatEvent>,
}

impl SeatNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, event: SeatEvent) {
        // send() errors only when nobody is subscribed
        if self.tx.send(event).is_err() {
            debug!("seat event dropped: no realtime subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SeatEvent> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn publish_without_subscribers_does_not_panic() {
        let notifier = SeatNotifier::new(16);
        notifier.publish(SeatEvent::Released {
            trip_id: Uuid::new_v4(),
            seat_id: Uuid::new_v4(),
        });
    }

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let notifier = SeatNotifier::new(16);
        let mut rx = notifier.subscribe();

        let trip_id = Uuid::new_v4();
        notifier.publish(SeatEvent::Released {
            trip_id,
            seat_id: Uuid::new_v4(),
        });

        let event = rx.recv().await.expect("receives");
        assert_eq!(event.trip_id(), trip_id);
    }
}
