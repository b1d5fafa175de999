//! Seat Model

use serde::{Deserialize, Serialize};

/// 座位类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatType {
    /// 卡座
    Booth,
    /// 包间
    Box,
    /// 散座
    Open,
}

/// Seat entity (座位)
///
/// Catalog entry; referenced by id from locks, bookings and orders.
/// Never mutated on the claim path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Seat {
    pub id: i64,
    /// Human-facing seat code, unique (e.g. "A3")
    pub name: String,
    pub description: Option<String>,
    pub seat_type: SeatType,
    pub capacity: i32,
    pub is_active: bool,
}

/// Create seat payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatCreate {
    pub name: String,
    pub description: Option<String>,
    pub seat_type: SeatType,
    pub capacity: Option<i32>,
}
