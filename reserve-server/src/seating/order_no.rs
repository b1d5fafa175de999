//! Order number generation
//!
//! Human-facing order numbers are best-effort unique: a coarse time
//! component plus a random suffix, checked against the order store and
//! regenerated on collision up to a bounded budget. The UNIQUE constraint on
//! `reserve_order.no` catches the remaining race, which callers retry within
//! the same budget.

use sqlx::SqliteConnection;
use tracing::warn;

use super::error::SeatingError;
use crate::db::repository::order as order_repo;

/// Produces order-number candidates.
///
/// Behind a trait so tests can narrow the id space to force collisions and
/// exhaustion.
pub trait OrderNoSource: Send + Sync {
    fn candidate(&self) -> String;
}

/// Default source: last 10 digits of the millisecond timestamp plus a
/// 4-digit random suffix (10⁴ candidates per millisecond).
#[derive(Debug, Default)]
pub struct TimestampSource;

impl OrderNoSource for TimestampSource {
    fn candidate(&self) -> String {
        use rand::Rng;
        let ts = shared::util::now_millis() % 10_000_000_000;
        let suffix: u32 = rand::thread_rng().gen_range(1000..10000);
        format!("{ts:010}{suffix}")
    }
}

/// Bounded check-then-use generator
pub struct OrderNoGenerator {
    source: Box<dyn OrderNoSource>,
    max_attempts: u32,
}

impl OrderNoGenerator {
    /// Default generator; the attempt budget is clamped to at least 5.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            source: Box::new(TimestampSource),
            max_attempts: max_attempts.max(5),
        }
    }

    /// Generator with a custom candidate source and an unclamped budget
    /// (tests narrow both).
    pub fn with_source(source: Box<dyn OrderNoSource>, max_attempts: u32) -> Self {
        Self {
            source,
            max_attempts,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Allocate a candidate not currently present in the order store.
    ///
    /// Runs on the caller's connection so the existence check shares the
    /// claim transaction's snapshot when called from inside one.
    pub async fn next(&self, conn: &mut SqliteConnection) -> Result<String, SeatingError> {
        for attempt in 0..self.max_attempts {
            let candidate = self.source.candidate();
            if !order_repo::exists_no(&mut *conn, &candidate)
                .await
                .map_err(SeatingError::from)?
            {
                return Ok(candidate);
            }
            warn!(
                candidate = %candidate,
                attempt = attempt + 1,
                "Order number collision, regenerating"
            );
        }
        Err(SeatingError::IdExhausted)
    }
}

impl std::fmt::Debug for OrderNoGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderNoGenerator")
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}
