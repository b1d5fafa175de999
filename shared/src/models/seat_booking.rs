//! Seat Booking Model

use serde::{Deserialize, Serialize};

use super::seat_lock::ClaimStatus;

/// Seat booking entity (预订)
///
/// Confirmed, time-specific reservation. Created atomically with its
/// reservation order; at most one ACTIVE booking per (seat, day) — the
/// claim transaction checks, and a partial unique index backstops it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SeatBooking {
    pub id: i64,
    pub seat_id: i64,
    pub holder_id: String,
    /// Reserved arrival instant, Unix millis
    pub arrival_time: i64,
    /// Venue-local calendar day of the arrival, `YYYY-MM-DD`
    pub date_bucket: String,
    pub status: ClaimStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create seat booking payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatBookingCreate {
    pub seat_id: i64,
    pub holder_id: String,
    pub arrival_time: i64,
    pub date_bucket: String,
}
