use ruta_domain::booking::{Booking, PassengerDetail};
use ruta_domain::EngineError;
use uuid::Uuid;

use crate::PgTx;

pub struct BookingRepository;

impl BookingRepository {
    /// Inserts the booking row. Runs inside the finalization transaction so
    /// a failure after this point rolls the booking back with everything
    /// else.
    pub async fn insert_booking(tx: &mut PgTx<'_>, booking: &Booking) -> Result<(), EngineError> {
        sqlx::query(
            r#"
            INSERT INTO bookings
                (id, trip_id, status, total_amount_cents,
                 contact_email, contact_phone, payment_method_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(booking.id)
        .bind(booking.trip_id)
        .bind(booking.status.as_str())
        .bind(booking.total_amount_cents)
        .bind(&booking.contact_email)
        .bind(&booking.contact_phone)
        .bind(&booking.payment_method_id)
        .bind(booking.created_at)
        .execute(&mut **tx)
        .await
        .map_err(EngineError::database)?;

        Ok(())
    }

    pub async fn insert_passenger(
        tx: &mut PgTx<'_>,
        booking_id: Uuid,
        passenger: &PassengerDetail,
        seat_id: Uuid,
    ) -> Result<Uuid, EngineError> {
        let passenger_id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO passengers (id, booking_id, full_name, document_id, seat_id, phone)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(passenger_id)
        .bind(booking_id)
        .bind(&passenger.full_name)
        .bind(&passenger.document_id)
        .bind(seat_id)
        .bind(&passenger.phone)
        .execute(&mut **tx)
        .await
        .map_err(EngineError::database)?;

        Ok(passenger_id)
    }
}
