use async_trait::async_trait;
use uuid::Uuid;

use crate::error::EngineError;

/// Advisory "someone is looking at this seat" store. Entries are UX hints
/// with their own TTL and are never consulted by the lock or booking paths;
/// an entry expiring or being released has no effect on the ledger.
#[async_trait]
pub trait SelectionStore: Send + Sync {
    /// Atomic set-if-absent with TTL. Returns false when another holder
    /// already has the seat selected.
    async fn try_select(
        &self,
        trip_id: Uuid,
        seat_id: Uuid,
        holder: &str,
        ttl_seconds: u64,
    ) -> Result<bool, EngineError>;

    /// Removes the entry only if `holder` currently owns it.
    async fn release(
        &self,
        trip_id: Uuid,
        seat_id: Uuid,
        holder: &str,
    ) -> Result<bool, EngineError>;

    /// The current holder, if any.
    async fn holder_of(
        &self,
        trip_id: Uuid,
        seat_id: Uuid,
    ) -> Result<Option<String>, EngineError>;
}
