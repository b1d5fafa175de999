//! Loyalty collaborator
//!
//! Point accrual math lives outside this core; the lifecycle only makes the
//! collaborator call after a successful payment.

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum LoyaltyError {
    #[error("Loyalty backend unavailable: {0}")]
    Unavailable(String),
}

/// External loyalty system boundary
#[async_trait]
pub trait LoyaltyService: Send + Sync {
    async fn add_points(
        &self,
        holder_id: &str,
        amount_paid: f64,
        reason: &str,
    ) -> Result<(), LoyaltyError>;
}

/// In-process stand-in for the real loyalty backend: one point per whole
/// currency unit, accumulated in memory.
#[derive(Debug, Default)]
pub struct SimulatedLoyalty {
    points: DashMap<String, i64>,
}

impl SimulatedLoyalty {
    pub fn new() -> Self {
        Self {
            points: DashMap::new(),
        }
    }

    pub fn points_of(&self, holder_id: &str) -> i64 {
        self.points.get(holder_id).map(|p| *p).unwrap_or(0)
    }
}

#[async_trait]
impl LoyaltyService for SimulatedLoyalty {
    async fn add_points(
        &self,
        holder_id: &str,
        amount_paid: f64,
        reason: &str,
    ) -> Result<(), LoyaltyError> {
        let earned = amount_paid.floor() as i64;
        let mut entry = self.points.entry(holder_id.to_string()).or_insert(0);
        *entry += earned;
        info!(holder_id, earned, total = *entry, reason, "Loyalty points credited");
        Ok(())
    }
}
