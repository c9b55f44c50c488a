use chrono::{DateTime, Utc};
use ruta_domain::trip::{Trip, TripStatus};
use ruta_domain::EngineError;
use sqlx::PgExecutor;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct TripRow {
    id: Uuid,
    bus_id: Uuid,
    origin: String,
    destination: String,
    departure_at: DateTime<Utc>,
    base_price_cents: i64,
    status: String,
    bus_active: bool,
    operator_active: bool,
}

impl TripRow {
    fn into_trip(self) -> Result<Trip, EngineError> {
        let status = TripStatus::parse(&self.status)
            .ok_or_else(|| EngineError::database(format!("unknown trip status {}", self.status)))?;
        Ok(Trip {
            id: self.id,
            bus_id: self.bus_id,
            origin: self.origin,
            destination: self.destination,
            departure_at: self.departure_at,
            base_price_cents: self.base_price_cents,
            status,
            bus_active: self.bus_active,
            operator_active: self.operator_active,
        })
    }
}

pub struct TripRepository;

impl TripRepository {
    /// Fetches a trip joined with the activity flags of its bus and
    /// operator. Callable on the pool or inside a transaction.
    pub async fn fetch<'e, E>(executor: E, trip_id: Uuid) -> Result<Option<Trip>, EngineError>
    where
        E: PgExecutor<'e>,
    {
        let row: Option<TripRow> = sqlx::query_as(
            r#"
            SELECT t.id, t.bus_id, t.origin, t.destination, t.departure_at,
                   t.base_price_cents, t.status,
                   b.active AS bus_active, o.active AS operator_active
            FROM trips t
            JOIN buses b ON b.id = t.bus_id
            JOIN operators o ON o.id = b.operator_id
            WHERE t.id = $1
            "#,
        )
        .bind(trip_id)
        .fetch_optional(executor)
        .await
        .map_err(EngineError::database)?;

        row.map(TripRow::into_trip).transpose()
    }
}
