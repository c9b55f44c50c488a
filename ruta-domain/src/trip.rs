use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Scheduled,
    Departed,
    Cancelled,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Scheduled => "scheduled",
            TripStatus::Departed => "departed",
            TripStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(TripStatus::Scheduled),
            "departed" => Some(TripStatus::Departed),
            "cancelled" => Some(TripStatus::Cancelled),
            _ => None,
        }
    }
}

/// A trip as the engine sees it: the immutable catalog row joined with the
/// activity flags of its bus and operator. The engine only reads trips.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: Uuid,
    pub bus_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub departure_at: DateTime<Utc>,
    pub base_price_cents: i64,
    pub status: TripStatus,
    pub bus_active: bool,
    pub operator_active: bool,
}

impl Trip {
    /// Fail-fast eligibility check shared by the lock and booking paths.
    pub fn ensure_bookable(&self, now: DateTime<Utc>) -> Result<(), EngineError> {
        if self.status != TripStatus::Scheduled {
            return Err(EngineError::TripUnavailable {
                reason: format!("trip is {}", self.status.as_str()),
            });
        }
        if self.departure_at <= now {
            return Err(EngineError::TripUnavailable {
                reason: "trip has already departed".to_string(),
            });
        }
        if !self.bus_active {
            return Err(EngineError::TripUnavailable {
                reason: "bus is inactive".to_string(),
            });
        }
        if !self.operator_active {
            return Err(EngineError::TripUnavailable {
                reason: "operator is inactive".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn trip(status: TripStatus, departure_offset_secs: i64) -> Trip {
        Trip {
            id: Uuid::new_v4(),
            bus_id: Uuid::new_v4(),
            origin: "La Paz".into(),
            destination: "Oruro".into(),
            departure_at: Utc::now() + Duration::seconds(departure_offset_secs),
            base_price_cents: 3500,
            status,
            bus_active: true,
            operator_active: true,
        }
    }

    #[test]
    fn scheduled_future_trip_is_bookable() {
        assert!(trip(TripStatus::Scheduled, 3600).ensure_bookable(Utc::now()).is_ok());
    }

    #[test]
    fn cancelled_or_departed_trip_is_not() {
        for status in [TripStatus::Cancelled, TripStatus::Departed] {
            let err = trip(status, 3600).ensure_bookable(Utc::now()).unwrap_err();
            assert_eq!(err.code(), "TRIP_UNAVAILABLE");
        }
    }

    #[test]
    fn past_departure_is_not_bookable() {
        let err = trip(TripStatus::Scheduled, -60).ensure_bookable(Utc::now()).unwrap_err();
        assert_eq!(err.code(), "TRIP_UNAVAILABLE");
    }

    #[test]
    fn inactive_bus_or_operator_is_not_bookable() {
        let mut t = trip(TripStatus::Scheduled, 3600);
        t.bus_active = false;
        assert!(t.ensure_bookable(Utc::now()).is_err());

        let mut t = trip(TripStatus::Scheduled, 3600);
        t.operator_active = false;
        assert!(t.ensure_bookable(Utc::now()).is_err());
    }
}
