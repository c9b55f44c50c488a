use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatState {
    Available,
    Locked,
    Booked,
}

impl SeatState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatState::Available => "available",
            SeatState::Locked => "locked",
            SeatState::Booked => "booked",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "available" => Some(SeatState::Available),
            "locked" => Some(SeatState::Locked),
            "booked" => Some(SeatState::Booked),
            _ => None,
        }
    }
}

impl std::fmt::Display for SeatState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authoritative per-(trip, seat) ledger row. `locked_until` is only
/// meaningful while `state` is `Locked`; `booking_id` is set iff `Booked`.
/// Both invariants are also enforced by CHECK constraints in the schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatInventoryRecord {
    pub trip_id: Uuid,
    pub seat_id: Uuid,
    pub seat_code: String,
    pub state: SeatState,
    pub locked_until: Option<DateTime<Utc>>,
    pub booking_id: Option<Uuid>,
}

impl SeatInventoryRecord {
    /// True while the row holds an unexpired lease. An expired lease is a
    /// lease in name only: the reconciler just hasn't swept it yet.
    pub fn lease_active(&self, now: DateTime<Utc>) -> bool {
        self.state == SeatState::Locked && self.locked_until.is_some_and(|until| until > now)
    }
}

/// All-or-nothing eligibility check for a lock request. Any booked seat or
/// any seat under an active lease rejects the entire set; a seat whose
/// lease has lapsed is treated as available.
pub fn check_lockable(rows: &[SeatInventoryRecord], now: DateTime<Utc>) -> Result<(), EngineError> {
    for row in rows {
        match row.state {
            SeatState::Booked => {
                return Err(EngineError::SeatBooked {
                    seat: row.seat_code.clone(),
                })
            }
            SeatState::Locked => {
                if let Some(until) = row.locked_until {
                    if until > now {
                        return Err(EngineError::SeatLocked {
                            seat: row.seat_code.clone(),
                            locked_until: until,
                        });
                    }
                }
            }
            SeatState::Available => {}
        }
    }
    Ok(())
}

/// Re-validation of leased rows before a booking is honored. This is the
/// authority check that a cryptographically valid token cannot bypass:
/// every row must still be locked, unexpired, and unconsumed.
pub fn check_redeemable(
    rows: &[SeatInventoryRecord],
    now: DateTime<Utc>,
) -> Result<(), EngineError> {
    for row in rows {
        if row.booking_id.is_some() {
            return Err(EngineError::SeatBooked {
                seat: row.seat_code.clone(),
            });
        }
        match row.state {
            SeatState::Booked => {
                return Err(EngineError::SeatBooked {
                    seat: row.seat_code.clone(),
                })
            }
            SeatState::Available => {
                return Err(EngineError::LeaseExpired {
                    seat: row.seat_code.clone(),
                })
            }
            SeatState::Locked => {
                if !row.lease_active(now) {
                    return Err(EngineError::LeaseExpired {
                        seat: row.seat_code.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}
