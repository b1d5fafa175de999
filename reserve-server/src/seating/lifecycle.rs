//! LockLifecycle - cancellation and payment completion
//!
//! The order exclusively owns its claim records: cancellation flips the
//! order AND its linked booking/lock in one transaction, payment leaves the
//! claim records active (the seat stays claimed). No background expiry
//! exists — a lock outlives a vanished holder until its order is cancelled.

use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::{info, warn};

use shared::models::{Order, OrderStatus};
use shared::util::now_millis;

use super::error::SeatingError;
use crate::db::repository::{
    order as order_repo, seat_booking as booking_repo, seat_lock as lock_repo,
};
use crate::services::LoyaltyService;

#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    pub order_no: String,
    pub paid_amount: f64,
    pub transaction_id: String,
}

pub struct LockLifecycle {
    pool: SqlitePool,
    loyalty: Arc<dyn LoyaltyService>,
}

impl LockLifecycle {
    pub fn new(pool: SqlitePool, loyalty: Arc<dyn LoyaltyService>) -> Self {
        Self { pool, loyalty }
    }

    /// Cancel a pending order and invalidate its claim records.
    ///
    /// All three writes (order, booking, lock) commit together; a second
    /// cancel of the same order fails with `InvalidState` and touches
    /// nothing.
    pub async fn cancel_order(&self, order_id: i64, holder_id: &str) -> Result<(), SeatingError> {
        let order = self.load_owned_pending(order_id, holder_id, "cancel").await?;

        let now = now_millis();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| SeatingError::Store(e.to_string()))?;

        let cancelled = order_repo::cancel(&mut *tx, order.id, now).await?;
        if !cancelled {
            // Raced with another cancel/payment between load and update
            tx.rollback()
                .await
                .map_err(|e| SeatingError::Store(e.to_string()))?;
            return Err(SeatingError::InvalidState(format!(
                "Order {} is no longer pending",
                order.no
            )));
        }

        if let Some(book_id) = order.book_id {
            if !booking_repo::invalidate(&mut *tx, book_id, now).await? {
                warn!(order_id, book_id, "Linked booking was not active on cancel");
            }
        }
        if let Some(lock_id) = order.lock_id {
            if !lock_repo::invalidate(&mut *tx, lock_id, now).await? {
                warn!(order_id, lock_id, "Linked lock was not active on cancel");
            }
        }

        tx.commit()
            .await
            .map_err(|e| SeatingError::Store(e.to_string()))?;

        info!(order_id, order_no = %order.no, "Order cancelled, claim records invalidated");
        Ok(())
    }

    /// Complete payment for a pending order (simulated gateway).
    ///
    /// The linked booking/lock stay ACTIVE — paying claims the seat, it
    /// doesn't release it. Loyalty accrual is a collaborator call after the
    /// write; its failure is logged, never rolled into the order update.
    pub async fn complete_payment(
        &self,
        order_id: i64,
        holder_id: &str,
        amount: f64,
        method: &str,
    ) -> Result<PaymentOutcome, SeatingError> {
        if amount <= 0.0 {
            return Err(SeatingError::Validation(
                "Payment amount must be positive".into(),
            ));
        }

        let order = self.load_owned_pending(order_id, holder_id, "pay").await?;

        // Simulated gateway reference
        let now = now_millis();
        let transaction_id = {
            use rand::Rng;
            format!("TID{}{:03}", now, rand::thread_rng().gen_range(0..1000))
        };

        // Single guarded statement: the PENDING_PAYMENT predicate makes a
        // raced double-pay a no-op
        let paid =
            order_repo::mark_paid(&self.pool, order.id, amount, method, &transaction_id, now)
                .await?;
        if !paid {
            return Err(SeatingError::InvalidState(format!(
                "Order {} is no longer pending",
                order.no
            )));
        }

        info!(
            order_id,
            order_no = %order.no,
            amount,
            transaction_id = %transaction_id,
            "Payment completed"
        );

        // External side effect, outside the store write
        if let Err(e) = self
            .loyalty
            .add_points(&order.holder_id, amount, "order_paid")
            .await
        {
            warn!(order_id, error = %e, "Loyalty accrual failed, points not credited");
        }

        Ok(PaymentOutcome {
            order_no: order.no,
            paid_amount: amount,
            transaction_id,
        })
    }

    /// Load an order and check the shared preconditions of both lifecycle
    /// operations: it exists, belongs to the holder, and is unpaid.
    async fn load_owned_pending(
        &self,
        order_id: i64,
        holder_id: &str,
        action: &str,
    ) -> Result<Order, SeatingError> {
        let order = order_repo::find_by_id(&self.pool, order_id)
            .await
            .map_err(SeatingError::from)?
            .ok_or_else(|| SeatingError::Validation(format!("Order {order_id} not found")))?;

        if order.holder_id != holder_id {
            return Err(SeatingError::InvalidState(format!(
                "Order {} does not belong to this holder",
                order.no
            )));
        }
        if order.status != OrderStatus::PendingPayment {
            return Err(SeatingError::InvalidState(format!(
                "Cannot {action} order {} in its current status",
                order.no
            )));
        }
        Ok(order)
    }
}

impl std::fmt::Debug for LockLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockLifecycle").finish()
    }
}
