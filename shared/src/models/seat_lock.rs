//! Seat Lock Model

use serde::{Deserialize, Serialize};

/// Claim record status, shared by locks and bookings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    Active,
    Invalidated,
}

/// Seat lock entity (临时占用)
///
/// Advisory claim on a seat for one venue-local calendar day, created when a
/// walk-in order starts. Multiple active locks for the same (seat, day) are
/// representable; precedence is the resolver's job, not the store's.
/// A lock never expires on its own — it is invalidated by order cancellation
/// or deleted by the walk-in compensation path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SeatLock {
    pub id: i64,
    pub seat_id: i64,
    pub holder_id: String,
    /// Venue-local calendar day, `YYYY-MM-DD`
    pub date_bucket: String,
    pub status: ClaimStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create seat lock payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatLockCreate {
    pub seat_id: i64,
    pub holder_id: String,
    pub date_bucket: String,
}
