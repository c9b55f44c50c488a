use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::EngineError;
use crate::seat::SeatInventoryRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Paid,
    Cancelled,
    Expired,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Paid => "paid",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "paid" => Some(BookingStatus::Paid),
            "cancelled" => Some(BookingStatus::Cancelled),
            "expired" => Some(BookingStatus::Expired),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub status: BookingStatus,
    pub total_amount_cents: i64,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    /// Stored opaque; payment semantics live outside this engine.
    pub payment_method_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerDetail {
    pub full_name: String,
    pub document_id: String,
    pub seat_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub lock_token: String,
    pub passengers: Vec<PassengerDetail>,
    pub contact_info: ContactInfo,
    #[serde(default)]
    pub payment_method_id: Option<String>,
}

/// Renders integer cents as a two-decimal amount string.
pub fn format_amount(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

/// Checks the passenger payload against the leased seat rows: one passenger
/// per seat, every seat code drawn from the leased set, no duplicates.
pub fn validate_passengers(
    rows: &[SeatInventoryRecord],
    passengers: &[PassengerDetail],
) -> Result<(), EngineError> {
    if passengers.len() != rows.len() {
        return Err(EngineError::PassengerMismatch {
            reason: format!(
                "{} passengers for {} leased seats",
                passengers.len(),
                rows.len()
            ),
        });
    }

    let leased: HashSet<&str> = rows.iter().map(|r| r.seat_code.as_str()).collect();
    let mut seen: HashSet<&str> = HashSet::with_capacity(passengers.len());

    for p in passengers {
        if !leased.contains(p.seat_code.as_str()) {
            return Err(EngineError::PassengerMismatch {
                reason: format!("seat {} is not part of the leased set", p.seat_code),
            });
        }
        if !seen.insert(p.seat_code.as_str()) {
            return Err(EngineError::DuplicateSeatCode {
                seat: p.seat_code.clone(),
            });
        }
    }
    Ok(())
}
