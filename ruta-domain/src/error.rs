use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Every failure the reservation engine can surface. Each variant maps to a
/// stable machine-readable code so clients can re-render seat availability
/// without a full refresh.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("trip not found")]
    TripNotFound,

    #[error("trip not open for booking: {reason}")]
    TripUnavailable { reason: String },

    /// Lock path: a requested seat has no ledger row. This is a
    /// data-integrity problem (seats are enumerated when the trip is
    /// scheduled), not a business conflict.
    #[error("one or more requested seats have no inventory row")]
    MissingSeatRows,

    /// Finalize path: ledger rows vanished between lock and redemption.
    #[error("seat inventory rows not found for this trip")]
    SeatNotFound,

    #[error("seat {seat} is locked until {locked_until}")]
    SeatLocked {
        seat: String,
        locked_until: DateTime<Utc>,
    },

    #[error("seat {seat} is already booked")]
    SeatBooked { seat: String },

    /// The token was cryptographically fine but the ledger lease behind it
    /// is gone (expired or reclaimed).
    #[error("lease on seat {seat} is no longer held")]
    LeaseExpired { seat: String },

    #[error("invalid lock token: {reason}")]
    InvalidToken { reason: String },

    #[error("lock token expired")]
    TokenExpired,

    #[error("passenger payload does not match leased seats: {reason}")]
    PassengerMismatch { reason: String },

    #[error("duplicate seat code {seat} in passenger list")]
    DuplicateSeatCode { seat: String },

    /// Lock path: the same seat id appears twice in one request. Kept apart
    /// from `DuplicateSeatCode` so clients can tell a malformed lock
    /// request from a conflicting passenger payload.
    #[error("duplicate seat id {seat_id} in lock request")]
    DuplicateSeatId { seat_id: Uuid },

    #[error("no seats requested")]
    EmptySeatSelection,

    #[error("storage error: {0}")]
    Database(String),
}

impl EngineError {
    /// Wraps any storage-layer failure. The detail stays server-side; the
    /// API layer only leaks the code.
    pub fn database<E: std::fmt::Display>(err: E) -> Self {
        Self::Database(err.to_string())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::TripNotFound => "TRIP_NOT_FOUND",
            Self::TripUnavailable { .. } => "TRIP_UNAVAILABLE",
            Self::MissingSeatRows | Self::SeatNotFound => "SEAT_NOT_FOUND",
            Self::SeatLocked { .. } => "SEAT_LOCKED",
            Self::SeatBooked { .. } => "SEAT_BOOKED",
            Self::LeaseExpired { .. } => "SEAT_LOCK_EXPIRED",
            Self::InvalidToken { .. } => "TOKEN_INVALID",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::PassengerMismatch { .. } => "PASSENGER_MISMATCH",
            Self::DuplicateSeatCode { .. } => "DUPLICATE_SEAT",
            Self::DuplicateSeatId { .. } => "DUPLICATE_SEAT_ID",
            Self::EmptySeatSelection => "EMPTY_SEAT_SELECTION",
            Self::Database(_) => "INTERNAL",
        }
    }

    /// The seat a conflict is about, where one exists.
    pub fn seat(&self) -> Option<&str> {
        match self {
            Self::SeatLocked { seat, .. }
            | Self::SeatBooked { seat }
            | Self::LeaseExpired { seat }
            | Self::DuplicateSeatCode { seat } => Some(seat),
            _ => None,
        }
    }

    pub fn locked_until(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::SeatLocked { locked_until, .. } => Some(*locked_until),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_codes_are_stable() {
        let err = EngineError::SeatLocked {
            seat: "A1".into(),
            locked_until: Utc::now(),
        };
        assert_eq!(err.code(), "SEAT_LOCKED");
        assert_eq!(err.seat(), Some("A1"));
        assert!(err.locked_until().is_some());

        assert_eq!(EngineError::TripNotFound.code(), "TRIP_NOT_FOUND");
        assert_eq!(EngineError::MissingSeatRows.code(), "SEAT_NOT_FOUND");
        assert_eq!(EngineError::SeatNotFound.code(), "SEAT_NOT_FOUND");
        assert_eq!(
            EngineError::LeaseExpired { seat: "B2".into() }.code(),
            "SEAT_LOCK_EXPIRED"
        );
    }

    #[test]
    fn duplicate_id_and_duplicate_code_are_distinct() {
        let by_id = EngineError::DuplicateSeatId {
            seat_id: Uuid::new_v4(),
        };
        let by_code = EngineError::DuplicateSeatCode { seat: "A1".into() };
        assert_eq!(by_id.code(), "DUPLICATE_SEAT_ID");
        assert_eq!(by_code.code(), "DUPLICATE_SEAT");
        // seat ids are not seat codes; the wire `seat` field stays codes-only
        assert_eq!(by_id.seat(), None);
        assert_eq!(by_code.seat(), Some("A1"));
    }

    #[test]
    fn database_detail_not_in_code() {
        let err = EngineError::database("connection refused");
        assert_eq!(err.code(), "INTERNAL");
        assert!(err.to_string().contains("connection refused"));
    }
}
