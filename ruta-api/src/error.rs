use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ruta_domain::EngineError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    Engine(EngineError),
    Internal(anyhow::Error),
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        Self::Engine(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Engine(err) => {
                let status = match &err {
                    EngineError::TripNotFound | EngineError::SeatNotFound => StatusCode::NOT_FOUND,
                    EngineError::TripUnavailable { .. }
                    | EngineError::SeatLocked { .. }
                    | EngineError::SeatBooked { .. }
                    | EngineError::LeaseExpired { .. } => StatusCode::CONFLICT,
                    EngineError::MissingSeatRows
                    | EngineError::InvalidToken { .. }
                    | EngineError::TokenExpired
                    | EngineError::PassengerMismatch { .. }
                    | EngineError::DuplicateSeatCode { .. }
                    | EngineError::DuplicateSeatId { .. }
                    | EngineError::EmptySeatSelection => StatusCode::BAD_REQUEST,
                    EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };

                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    tracing::error!("Internal Server Error: {}", err);
                    return (
                        status,
                        Json(json!({ "error": "INTERNAL", "message": "Internal Server Error" })),
                    )
                        .into_response();
                }

                let mut body = json!({
                    "error": err.code(),
                    "message": err.to_string(),
                });
                if let Some(seat) = err.seat() {
                    body["seat"] = json!(seat);
                }
                if let Some(until) = err.locked_until() {
                    body["lockedUntil"] = json!(until.to_rfc3339());
                }

                (status, Json(body)).into_response()
            }
            AppError::Internal(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "INTERNAL", "message": "Internal Server Error" })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use chrono::Utc;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("reads body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn conflict_body_names_seat_and_deadline() {
        let until = Utc::now();
        let response = AppError::from(EngineError::SeatLocked {
            seat: "A1".into(),
            locked_until: until,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body_json(response).await;
        assert_eq!(body["error"], "SEAT_LOCKED");
        assert_eq!(body["seat"], "A1");
        assert_eq!(body["lockedUntil"], until.to_rfc3339());
        assert!(body["message"].as_str().expect("message").contains("A1"));
    }

    #[tokio::test]
    async fn booked_conflict_names_seat_without_deadline() {
        let response =
            AppError::from(EngineError::SeatBooked { seat: "C4".into() }).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body_json(response).await;
        assert_eq!(body["error"], "SEAT_BOOKED");
        assert_eq!(body["seat"], "C4");
        assert!(body.get("lockedUntil").is_none());
    }

    #[tokio::test]
    async fn database_errors_do_not_leak_detail() {
        let response =
            AppError::from(EngineError::database("password for role ruta")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "INTERNAL");
        assert!(!body.to_string().contains("password"));
    }

    #[tokio::test]
    async fn token_failures_are_bad_requests() {
        let response = AppError::from(EngineError::TokenExpired).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "TOKEN_EXPIRED");

        let response = AppError::from(EngineError::InvalidToken {
            reason: "InvalidSignature".into(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "TOKEN_INVALID");
    }
}
