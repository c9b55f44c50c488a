use axum::{
    extract::{Json, State},
    routing::post,
    Router,
};
use ruta_engine::SeatLockGrant;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LockSeatsRequest {
    trip_id: Uuid,
    seat_ids: Vec<Uuid>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/locks", post(lock_seats))
}

async fn lock_seats(
    State(state): State<AppState>,
    Json(req): Json<LockSeatsRequest>,
) -> Result<Json<SeatLockGrant>, AppError> {
    let grant = state
        .coordinator
        .lock_seats(req.trip_id, &req.seat_ids)
        .await?;
    Ok(Json(grant))
}
