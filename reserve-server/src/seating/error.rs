//! Seating domain errors

use thiserror::Error;

use crate::db::repository::RepoError;
use crate::utils::AppError;

/// Errors from the claim paths (booking, walk-in, cancel, pay)
///
/// Conflict-class variants (`SeatConflict`, `AlreadyPending`) tell the caller
/// to re-check availability; `IdExhausted` and `Store` are transient and safe
/// to retry after backoff.
#[derive(Debug, Error)]
pub enum SeatingError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Seat already booked or locked for that day")]
    SeatConflict,

    #[error("Holder already has pending order {order_no}")]
    AlreadyPending { order_id: i64, order_no: String },

    #[error("Order number space exhausted, try again later")]
    IdExhausted,

    #[error("Invalid order state: {0}")]
    InvalidState(String),

    #[error("Store failure: {0}")]
    Store(String),
}

impl From<RepoError> for SeatingError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => SeatingError::Validation(msg),
            RepoError::Validation(msg) => SeatingError::Validation(msg),
            // Inside the claim transaction the only unique constraints are the
            // active-booking index and the order-number column; order-number
            // collisions are retried explicitly before this conversion runs.
            RepoError::Duplicate(_) => SeatingError::SeatConflict,
            RepoError::Database(msg) => SeatingError::Store(msg),
        }
    }
}

impl From<SeatingError> for AppError {
    fn from(e: SeatingError) -> Self {
        match e {
            SeatingError::Validation(msg) => AppError::Validation(msg),
            SeatingError::SeatConflict => {
                AppError::Conflict("Seat already booked or locked for that day".into())
            }
            SeatingError::AlreadyPending { order_no, .. } => AppError::AlreadyPending(format!(
                "Pending order {order_no} must be paid or cancelled first"
            )),
            SeatingError::IdExhausted => {
                AppError::Busy("Could not allocate an order number, try again".into())
            }
            SeatingError::InvalidState(msg) => AppError::InvalidState(msg),
            SeatingError::Store(msg) => AppError::Database(msg),
        }
    }
}
