use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use ruta_domain::seat::SeatState;
use ruta_store::seat_repo::SeatRepository;
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SeatMapEntry {
    seat_id: Uuid,
    seat_code: String,
    state: SeatState,
    #[serde(skip_serializing_if = "Option::is_none")]
    locked_until: Option<DateTime<Utc>>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/trips/{trip_id}/seats", get(seat_map))
}

/// Read-only availability snapshot so clients can render the seat map
/// without joining the realtime room. Booking ids stay server-side.
async fn seat_map(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<Vec<SeatMapEntry>>, AppError> {
    let rows = SeatRepository::seat_map(&state.db.pool, trip_id).await?;
    let entries = rows
        .into_iter()
        .map(|r| SeatMapEntry {
            seat_id: r.seat_id,
            seat_code: r.seat_code,
            state: r.state,
            locked_until: r.locked_until,
        })
        .collect();
    Ok(Json(entries))
}
