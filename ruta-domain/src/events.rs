use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Seat-state change notifications fanned out to trip rooms. Advisory
/// selection events and authoritative ledger transitions share one channel;
/// the event name tells the client which tier it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SeatEvent {
    #[serde(rename = "seat:selected", rename_all = "camelCase")]
    Selected {
        trip_id: Uuid,
        seat_id: Uuid,
        holder: String,
    },
    #[serde(rename = "seat:released", rename_all = "camelCase")]
    Released { trip_id: Uuid, seat_id: Uuid },
    #[serde(rename = "seat:locked", rename_all = "camelCase")]
    Locked {
        trip_id: Uuid,
        seat_ids: Vec<Uuid>,
        locked_until: DateTime<Utc>,
    },
    #[serde(rename = "seat:booked", rename_all = "camelCase")]
    Booked {
        trip_id: Uuid,
        seat_ids: Vec<Uuid>,
        booking_id: Uuid,
    },
    #[serde(rename = "seat:available", rename_all = "camelCase")]
    Reclaimed { trip_id: Uuid, seat_id: Uuid },
}

impl SeatEvent {
    /// The trip room this event belongs to.
    pub fn trip_id(&self) -> Uuid {
        match self {
            SeatEvent::Selected { trip_id, .. }
            | SeatEvent::Released { trip_id, .. }
            | SeatEvent::Locked { trip_id, .. }
            | SeatEvent::Booked { trip_id, .. }
            | SeatEvent::Reclaimed { trip_id, .. } => *trip_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_carry_wire_names() {
        let event = SeatEvent::Selected {
            trip_id: Uuid::new_v4(),
            seat_id: Uuid::new_v4(),
            holder: "viewer-1".into(),
        };
        let json = serde_json::to_value(&event).expect("serializes");
        assert_eq!(json["type"], "seat:selected");
        assert!(json["tripId"].is_string());
        assert!(json["seatId"].is_string());

        let event = SeatEvent::Locked {
            trip_id: Uuid::new_v4(),
            seat_ids: vec![Uuid::new_v4()],
            locked_until: Utc::now(),
        };
        let json = serde_json::to_value(&event).expect("serializes");
        assert_eq!(json["type"], "seat:locked");
        assert!(json["lockedUntil"].is_string());
    }
}
