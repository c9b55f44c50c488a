use std::time::Duration;

use ruta_domain::events::SeatEvent;
use ruta_domain::EngineError;
use ruta_store::seat_repo::SeatRepository;
use sqlx::PgPool;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::notifier::SeatNotifier;

/// Background safety net for abandoned leases: periodically returns
/// expired, unconsumed leases to the available pool. The sweep is a single
/// idempotent UPDATE, so running it twice in succession reclaims nothing
/// the second time, and in-flight lock/booking transactions are excluded by
/// their own row locks.
pub struct LeaseReconciler {
    pool: PgPool,
    notifier: SeatNotifier,
    interval: Duration,
}

impl LeaseReconciler {
    pub fn new(pool: PgPool, notifier: SeatNotifier, interval_seconds: u64) -> Self {
        Self {
            pool,
            notifier,
            interval: Duration::from_secs(interval_seconds),
        }
    }

    /// One sweep. Returns how many leases were reclaimed.
    pub async fn sweep(&self) -> Result<usize, EngineError> {
        let reclaimed = SeatRepository::release_expired(&self.pool).await?;
        for (trip_id, seat_id) in &reclaimed {
            self.notifier.publish(SeatEvent::Reclaimed {
                trip_id: *trip_id,
                seat_id: *seat_id,
            });
        }
        if !reclaimed.is_empty() {
            info!(count = reclaimed.len(), "reclaimed expired seat leases");
        }
        Ok(reclaimed.len())
    }

    /// Spawns the periodic sweep, independent of request traffic. Failures
    /// are logged and retried on the next tick; a missed sweep only delays
    /// reclamation.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(err) = self.sweep().await {
                    error!("lease sweep failed: {err}");
                }
            }
        })
    }
}
