//! Seat Availability Model

use serde::{Deserialize, Serialize};

/// Availability status for one (seat, day)
///
/// Closed set — the resolver matches exhaustively, so adding a state forces
/// every precedence rule to be revisited at compile time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    /// No active booking or lock
    Available,
    /// Claimed by the requesting holder (own booking or own lock)
    SelfTempAvailable,
    /// Booked by another holder but usable until the grace window starts
    OtherTempAvailable,
    /// Exclusively claimed — booked within grace, or locked by another holder
    LockedUnavailable,
}

/// Resolver output: status plus display times when a booking is involved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Availability {
    pub status: SeatStatus,
    /// Reserved arrival instant, Unix millis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<i64>,
    /// When the seat must be vacated for the booking (arrival − grace)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vacate_at: Option<i64>,
}

impl Availability {
    pub fn available() -> Self {
        Self {
            status: SeatStatus::Available,
            arrival_time: None,
            vacate_at: None,
        }
    }
}
