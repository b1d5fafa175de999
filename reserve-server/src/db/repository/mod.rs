//! Repository Module
//!
//! CRUD operations over the SQLite pool. Claim-path repositories
//! (`seat_lock`, `seat_booking`, `order`) are generic over the executor so
//! the same functions run inside coordinator transactions; timestamps cross
//! this boundary as `i64` Unix millis only.

// Catalog
pub mod seat;

// Claim records
pub mod seat_booking;
pub mod seat_lock;

// Orders
pub mod order;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = err {
            if db.is_unique_violation() {
                return RepoError::Duplicate(db.message().to_string());
            }
        }
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
