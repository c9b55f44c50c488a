use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod bookings;
pub mod error;
pub mod locks;
pub mod state;
pub mod trips;
pub mod ws;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    Router::new()
        .merge(locks::routes())
        .merge(bookings::routes())
        .merge(trips::routes())
        .merge(ws::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
