use std::collections::HashMap;

use chrono::{DateTime, Utc};
use ruta_domain::booking::{
    format_amount, validate_passengers, Booking, BookingStatus, CreateBookingRequest,
    PassengerDetail,
};
use ruta_domain::events::SeatEvent;
use ruta_domain::seat::check_redeemable;
use ruta_domain::EngineError;
use ruta_store::booking_repo::BookingRepository;
use ruta_store::seat_repo::SeatRepository;
use ruta_store::trip_repo::TripRepository;
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::notifier::SeatNotifier;
use crate::token::TokenSigner;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub booking_id: Uuid,
    pub trip_id: Uuid,
    pub status: BookingStatus,
    pub seats: Vec<String>,
    pub passengers: Vec<PassengerDetail>,
    /// Two-decimal amount string, `basePrice x seatCount`.
    pub total_amount: String,
    pub created_at: DateTime<Utc>,
}

/// Redeems a lock token, re-validates the ledger under row locks, and
/// atomically converts the lease into a permanent booking.
pub struct BookingFinalizer {
    pool: PgPool,
    signer: TokenSigner,
    notifier: SeatNotifier,
}

impl BookingFinalizer {
    pub fn new(pool: PgPool, signer: TokenSigner, notifier: SeatNotifier) -> Self {
        Self {
            pool,
            signer,
            notifier,
        }
    }

    /// Either creates exactly one booking plus its passenger rows and flips
    /// the leased seats to booked, or none of these effects occur. The
    /// token check and the ledger check are independent on purpose: a
    /// cryptographically valid token whose lease has expired or been
    /// reclaimed is refused by the ledger re-validation.
    pub async fn create_booking(
        &self,
        req: CreateBookingRequest,
    ) -> Result<BookingConfirmation, EngineError> {
        let claims = self.signer.verify(&req.lock_token)?;
        let trip_id = claims.trip_id;
        let seat_ids = claims.seat_ids;

        let mut tx = self.pool.begin().await.map_err(EngineError::database)?;
        // Repeatable read keeps the multi-row check free of phantom reads.
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await
            .map_err(EngineError::database)?;

        let trip = TripRepository::fetch(&mut *tx, trip_id)
            .await?
            .ok_or(EngineError::TripNotFound)?;

        let rows = SeatRepository::fetch_for_update(&mut tx, trip_id, &seat_ids).await?;
        if rows.len() != seat_ids.len() {
            let _ = tx.rollback().await;
            return Err(EngineError::SeatNotFound);
        }

        if let Err(err) = validate_passengers(&rows, &req.passengers) {
            let _ = tx.rollback().await;
            return Err(err);
        }

        let now = Utc::now();
        if let Err(err) = check_redeemable(&rows, now) {
            let _ = tx.rollback().await;
            return Err(err);
        }

        let total_amount_cents = trip.base_price_cents * rows.len() as i64;
        let booking = Booking {
            id: Uuid::new_v4(),
            trip_id,
            status: BookingStatus::Pending,
            total_amount_cents,
            contact_email: req.contact_info.email.clone(),
            contact_phone: req.contact_info.phone.clone(),
            payment_method_id: req.payment_method_id.clone(),
            created_at: now,
        };
        BookingRepository::insert_booking(&mut tx, &booking).await?;

        let seat_by_code: HashMap<&str, Uuid> = rows
            .iter()
            .map(|r| (r.seat_code.as_str(), r.seat_id))
            .collect();
        for passenger in &req.passengers {
            let seat_id = seat_by_code
                .get(passenger.seat_code.as_str())
                .copied()
                .ok_or_else(|| EngineError::PassengerMismatch {
                    reason: format!("seat {} is not part of the leased set", passenger.seat_code),
                })?;
            BookingRepository::insert_passenger(&mut tx, booking.id, passenger, seat_id).await?;
        }

        SeatRepository::mark_booked(&mut tx, trip_id, &seat_ids, booking.id).await?;
        tx.commit().await.map_err(EngineError::database)?;

        info!(%trip_id, booking_id = %booking.id, seats = seat_ids.len(), "booking finalized");
        self.notifier.publish(SeatEvent::Booked {
            trip_id,
            seat_ids: seat_ids.clone(),
            booking_id: booking.id,
        });

        Ok(BookingConfirmation {
            booking_id: booking.id,
            trip_id,
            status: booking.status,
            seats: rows.into_iter().map(|r| r.seat_code).collect(),
            passengers: req.passengers,
            total_amount: format_amount(total_amount_cents),
            created_at: booking.created_at,
        })
    }
}
