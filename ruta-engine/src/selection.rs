use std::sync::Arc;

use ruta_domain::events::SeatEvent;
use ruta_domain::selection::SelectionStore;
use ruta_domain::EngineError;
use uuid::Uuid;

use crate::notifier::SeatNotifier;

/// Advisory selection layer. Entries live in the ephemeral store with their
/// own TTL and never touch the ledger; the service only adds the realtime
/// echo so other viewers of the trip see "someone is looking at this seat".
pub struct SelectionService {
    store: Arc<dyn SelectionStore>,
    notifier: SeatNotifier,
    ttl_seconds: u64,
}

impl SelectionService {
    pub fn new(store: Arc<dyn SelectionStore>, notifier: SeatNotifier, ttl_seconds: u64) -> Self {
        Self {
            store,
            notifier,
            ttl_seconds,
        }
    }

    /// Returns false when another holder already has the seat selected.
    pub async fn select(
        &self,
        trip_id: Uuid,
        seat_id: Uuid,
        holder: &str,
    ) -> Result<bool, EngineError> {
        let granted = self
            .store
            .try_select(trip_id, seat_id, holder, self.ttl_seconds)
            .await?;
        if granted {
            self.notifier.publish(SeatEvent::Selected {
                trip_id,
                seat_id,
                holder: holder.to_string(),
            });
        }
        Ok(granted)
    }

    /// Only the current holder may release; a stale release from a previous
    /// viewer is a no-op.
    pub async fn release(
        &self,
        trip_id: Uuid,
        seat_id: Uuid,
        holder: &str,
    ) -> Result<bool, EngineError> {
        let released = self.store.release(trip_id, seat_id, holder).await?;
        if released {
            self.notifier.publish(SeatEvent::Released { trip_id, seat_id });
        }
        Ok(released)
    }

    pub async fn holder_of(
        &self,
        trip_id: Uuid,
        seat_id: Uuid,
    ) -> Result<Option<String>, EngineError> {
        self.store.holder_of(trip_id, seat_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory stand-in for the Redis store. TTL is not simulated; these
    /// tests cover the set-if-absent and holder-checked-release semantics.
    #[derive(Default)]
    struct MemorySelectionStore {
        entries: Mutex<HashMap<(Uuid, Uuid), String>>,
    }

    #[async_trait]
    impl SelectionStore for MemorySelectionStore {
        async fn try_select(
            &self,
            trip_id: Uuid,
            seat_id: Uuid,
            holder: &str,
            _ttl_seconds: u64,
        ) -> Result<bool, EngineError> {
            let mut entries = self.entries.lock().unwrap();
            match entries.entry((trip_id, seat_id)) {
                std::collections::hash_map::Entry::Occupied(_) => Ok(false),
                std::collections::hash_map::Entry::Vacant(slot) => {
                    slot.insert(holder.to_string());
                    Ok(true)
                }
            }
        }

        async fn release(
            &self,
            trip_id: Uuid,
            seat_id: Uuid,
            holder: &str,
        ) -> Result<bool, EngineError> {
            let mut entries = self.entries.lock().unwrap();
            if entries.get(&(trip_id, seat_id)).map(String::as_str) == Some(holder) {
                entries.remove(&(trip_id, seat_id));
                Ok(true)
            } else {
                Ok(false)
            }
        }

        async fn holder_of(
            &self,
            trip_id: Uuid,
            seat_id: Uuid,
        ) -> Result<Option<String>, EngineError> {
            Ok(self.entries.lock().unwrap().get(&(trip_id, seat_id)).cloned())
        }
    }

    fn service() -> SelectionService {
        SelectionService::new(
            Arc::new(MemorySelectionStore::default()),
            SeatNotifier::new(16),
            90,
        )
    }

    #[tokio::test]
    async fn second_holder_cannot_select_same_seat() {
        let svc = service();
        let (trip, seat) = (Uuid::new_v4(), Uuid::new_v4());

        assert!(svc.select(trip, seat, "alice").await.unwrap());
        assert!(!svc.select(trip, seat, "bob").await.unwrap());
        assert_eq!(svc.holder_of(trip, seat).await.unwrap().as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn only_holder_may_release() {
        let svc = service();
        let (trip, seat) = (Uuid::new_v4(), Uuid::new_v4());

        assert!(svc.select(trip, seat, "alice").await.unwrap());
        assert!(!svc.release(trip, seat, "bob").await.unwrap());
        assert!(svc.release(trip, seat, "alice").await.unwrap());
        assert_eq!(svc.holder_of(trip, seat).await.unwrap(), None);

        // After release the seat is selectable again, by anyone.
        assert!(svc.select(trip, seat, "bob").await.unwrap());
    }

    #[tokio::test]
    async fn selection_emits_realtime_echo() {
        let notifier = SeatNotifier::new(16);
        let mut rx = notifier.subscribe();
        let svc = SelectionService::new(Arc::new(MemorySelectionStore::default()), notifier, 90);

        let (trip, seat) = (Uuid::new_v4(), Uuid::new_v4());
        svc.select(trip, seat, "alice").await.unwrap();

        match rx.recv().await.unwrap() {
            SeatEvent::Selected { trip_id, seat_id, holder } => {
                assert_eq!(trip_id, trip);
                assert_eq!(seat_id, seat);
                assert_eq!(holder, "alice");
            }
            other => panic!("expected Selected, got {other:?}"),
        }

        // A refused selection produces no echo.
        svc.select(trip, seat, "bob").await.unwrap();
        svc.release(trip, seat, "alice").await.unwrap();
        assert!(matches!(rx.recv().await.unwrap(), SeatEvent::Released { .. }));
    }
}
