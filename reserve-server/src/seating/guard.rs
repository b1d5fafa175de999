//! Per-(seat, day) claim serialization
//!
//! SQLite serializes writers but not a check-then-insert sequence across
//! pooled connections, so the claim transaction holds this in-process guard
//! for its whole duration. The partial unique index on active bookings
//! backstops the same invariant at the store level.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Lock-free map of async mutexes, one per contended (seat, day) key
#[derive(Debug, Default)]
pub struct ClaimGuard {
    slots: DashMap<(i64, String), Arc<Mutex<()>>>,
}

impl ClaimGuard {
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    /// Acquire the mutex for one (seat, venue-local day).
    ///
    /// The returned guard must live until the claim transaction commits or
    /// rolls back.
    pub async fn acquire(&self, seat_id: i64, date_bucket: &str) -> OwnedMutexGuard<()> {
        let slot = self
            .slots
            .entry((seat_id, date_bucket.to_string()))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        slot.lock_owned().await
    }
}
