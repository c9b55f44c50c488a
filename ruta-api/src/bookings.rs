use axum::{
    extract::{Json, State},
    routing::post,
    Router,
};
use ruta_domain::booking::CreateBookingRequest;
use ruta_engine::BookingConfirmation;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/bookings", post(create_booking))
}

async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<BookingConfirmation>, AppError> {
    let confirmation = state.finalizer.create_booking(req).await?;
    Ok(Json(confirmation))
}
