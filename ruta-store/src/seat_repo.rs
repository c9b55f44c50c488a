use chrono::{DateTime, Utc};
use ruta_domain::seat::{SeatInventoryRecord, SeatState};
use ruta_domain::EngineError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::PgTx;

#[derive(sqlx::FromRow)]
struct SeatRow {
    trip_id: Uuid,
    seat_id: Uuid,
    seat_code: String,
    state: String,
    locked_until: Option<DateTime<Utc>>,
    booking_id: Option<Uuid>,
}

impl SeatRow {
    fn into_record(self) -> Result<SeatInventoryRecord, EngineError> {
        let state = SeatState::parse(&self.state)
            .ok_or_else(|| EngineError::database(format!("unknown seat state {}", self.state)))?;
        Ok(SeatInventoryRecord {
            trip_id: self.trip_id,
            seat_id: self.seat_id,
            seat_code: self.seat_code,
            state,
            locked_until: self.locked_until,
            booking_id: self.booking_id,
        })
    }
}

pub struct SeatRepository;

impl SeatRepository {
    /// Fetches the ledger rows for a seat set with a row-level write lock.
    /// Concurrent lockers of any overlapping set block here until the
    /// owning transaction commits or rolls back; that serialization is the
    /// core correctness mechanism of the engine.
    pub async fn fetch_for_update(
        tx: &mut PgTx<'_>,
        trip_id: Uuid,
        seat_ids: &[Uuid],
    ) -> Result<Vec<SeatInventoryRecord>, EngineError> {
        let rows: Vec<SeatRow> = sqlx::query_as(
            r#"
            SELECT ts.trip_id, ts.seat_id, s.code AS seat_code,
                   ts.state, ts.locked_until, ts.booking_id
            FROM trip_seats ts
            JOIN seats s ON s.id = ts.seat_id
            WHERE ts.trip_id = $1 AND ts.seat_id = ANY($2)
            ORDER BY s.code
            FOR UPDATE OF ts
            "#,
        )
        .bind(trip_id)
        .bind(seat_ids)
        .fetch_all(&mut **tx)
        .await
        .map_err(EngineError::database)?;

        rows.into_iter().map(SeatRow::into_record).collect()
    }

    /// Bulk-transitions rows to `locked` with the given lease deadline.
    /// Must run in the same transaction as the `fetch_for_update` that
    /// validated them.
    pub async fn mark_locked(
        tx: &mut PgTx<'_>,
        trip_id: Uuid,
        seat_ids: &[Uuid],
        locked_until: DateTime<Utc>,
    ) -> Result<u64, EngineError> {
        let result = sqlx::query(
            r#"
            UPDATE trip_seats
            SET state = 'locked', locked_until = $3
            WHERE trip_id = $1 AND seat_id = ANY($2)
            "#,
        )
        .bind(trip_id)
        .bind(seat_ids)
        .bind(locked_until)
        .execute(&mut **tx)
        .await
        .map_err(EngineError::database)?;

        Ok(result.rows_affected())
    }

    /// Bulk-converts leased rows into permanent bookings.
    pub async fn mark_booked(
        tx: &mut PgTx<'_>,
        trip_id: Uuid,
        seat_ids: &[Uuid],
        booking_id: Uuid,
    ) -> Result<u64, EngineError> {
        let result = sqlx::query(
            r#"
            UPDATE trip_seats
            SET state = 'booked', booking_id = $3, locked_until = NULL
            WHERE trip_id = $1 AND seat_id = ANY($2)
            "#,
        )
        .bind(trip_id)
        .bind(seat_ids)
        .bind(booking_id)
        .execute(&mut **tx)
        .await
        .map_err(EngineError::database)?;

        Ok(result.rows_affected())
    }

    /// Returns every expired, unconsumed lease to the available pool.
    /// Idempotent: rows already booked are excluded by the state predicate,
    /// renewed leases by the deadline predicate, and rows held by in-flight
    /// transactions are simply waited on.
    pub async fn release_expired(pool: &PgPool) -> Result<Vec<(Uuid, Uuid)>, EngineError> {
        let reclaimed: Vec<(Uuid, Uuid)> = sqlx::query_as(
            r#"
            UPDATE trip_seats
            SET state = 'available', locked_until = NULL
            WHERE state = 'locked' AND locked_until <= now()
            RETURNING trip_id, seat_id
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(EngineError::database)?;

        Ok(reclaimed)
    }

    /// Read-only seat map for a trip, for availability rendering.
    pub async fn seat_map(
        pool: &PgPool,
        trip_id: Uuid,
    ) -> Result<Vec<SeatInventoryRecord>, EngineError> {
        let rows: Vec<SeatRow> = sqlx::query_as(
            r#"
            SELECT ts.trip_id, ts.seat_id, s.code AS seat_code,
                   ts.state, ts.locked_until, ts.booking_id
            FROM trip_seats ts
            JOIN seats s ON s.id = ts.seat_id
            WHERE ts.trip_id = $1
            ORDER BY s.code
            "#,
        )
        .bind(trip_id)
        .fetch_all(pool)
        .await
        .map_err(EngineError::database)?;

        rows.into_iter().map(SeatRow::into_record).collect()
    }
}
