//! Data models
//!
//! Shared between reserve-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY); all timestamps are
//! `i64` Unix milliseconds.

pub mod availability;
pub mod order;
pub mod seat;
pub mod seat_booking;
pub mod seat_lock;

// Re-exports
pub use availability::*;
pub use order::*;
pub use seat::*;
pub use seat_booking::*;
pub use seat_lock::*;
