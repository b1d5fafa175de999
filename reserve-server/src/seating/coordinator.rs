//! ReservationCoordinator - claim transactions
//!
//! Owns the two write paths that convert an available seat into a claimed
//! one:
//!
//! - **Reservation** (`create_booking`): one isolated transaction — conflict
//!   re-check, order number, booking row, order row. Either both records
//!   exist and are linked, or neither does.
//! - **Walk-in** (`create_walk_in`): sequential writes with an explicit
//!   compensation step — the lock row is removed if order creation fails
//!   after it.
//!
//! Only this coordinator creates booking/lock rows; invalidation lives in
//! [`super::lifecycle`].

use chrono_tz::Tz;
use sqlx::SqlitePool;
use tracing::{error, info, warn};

use shared::models::{Order, OrderCreate, OrderItem, SeatBookingCreate, SeatLockCreate};
use shared::util::now_millis;

use super::error::SeatingError;
use super::guard::ClaimGuard;
use super::order_no::OrderNoGenerator;
use crate::db::repository::{
    RepoError, order as order_repo, seat as seat_repo, seat_booking as booking_repo,
    seat_lock as lock_repo,
};
use crate::utils::time;

/// Reservation request (arrival already converted to Unix millis by the
/// handler layer)
#[derive(Debug, Clone)]
pub struct CreateBookingRequest {
    pub seat_id: i64,
    pub holder_id: String,
    pub arrival_time: i64,
    pub guest_name: Option<String>,
    pub guest_phone: Option<String>,
    pub guest_id_card: Option<String>,
    pub total_amount: f64,
}

#[derive(Debug, Clone)]
pub struct CreateBookingOutcome {
    pub order_id: i64,
    pub order_no: String,
    pub book_id: i64,
}

/// Walk-in request
#[derive(Debug, Clone)]
pub struct CreateWalkInRequest {
    pub seat_code: String,
    pub holder_id: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub total_count: Option<i32>,
    pub remark: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateWalkInOutcome {
    pub order_id: i64,
    pub order_no: String,
    pub lock_id: i64,
}

pub struct ReservationCoordinator {
    pool: SqlitePool,
    tz: Tz,
    guard: ClaimGuard,
    order_no: OrderNoGenerator,
}

impl ReservationCoordinator {
    pub fn new(pool: SqlitePool, tz: Tz, order_no: OrderNoGenerator) -> Self {
        Self {
            pool,
            tz,
            guard: ClaimGuard::new(),
            order_no,
        }
    }

    /// Create a confirmed booking and its reservation order.
    ///
    /// The existence check and both inserts run in one transaction while the
    /// per-(seat, day) guard is held, so two concurrent claims for the same
    /// key cannot both observe "no conflict" and both commit.
    pub async fn create_booking(
        &self,
        req: CreateBookingRequest,
    ) -> Result<CreateBookingOutcome, SeatingError> {
        if req.holder_id.trim().is_empty() {
            return Err(SeatingError::Validation("holder_id is required".into()));
        }
        if req.total_amount < 0.0 {
            return Err(SeatingError::Validation(
                "total_amount cannot be negative".into(),
            ));
        }

        let seat = seat_repo::find_by_id(&self.pool, req.seat_id)
            .await
            .map_err(SeatingError::from)?
            .filter(|s| s.is_active)
            .ok_or_else(|| SeatingError::Validation(format!("Unknown seat {}", req.seat_id)))?;

        let date_bucket = time::date_bucket(req.arrival_time, self.tz);

        // Serialize claims per (seat, day); held until commit/rollback
        let _claim = self.guard.acquire(seat.id, &date_bucket).await;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| SeatingError::Store(e.to_string()))?;

        // Exclusivity re-check inside the transaction: any active booking or
        // lock on the day blocks, regardless of grace math
        let bookings = booking_repo::find_active_in_bucket(&mut *tx, seat.id, &date_bucket).await?;
        let locks = lock_repo::find_active_in_bucket(&mut *tx, seat.id, &date_bucket).await?;
        if !bookings.is_empty() || !locks.is_empty() {
            tx.rollback()
                .await
                .map_err(|e| SeatingError::Store(e.to_string()))?;
            return Err(SeatingError::SeatConflict);
        }

        let now = now_millis();
        let booking = booking_repo::create(
            &mut *tx,
            SeatBookingCreate {
                seat_id: seat.id,
                holder_id: req.holder_id.clone(),
                arrival_time: req.arrival_time,
                date_bucket: date_bucket.clone(),
            },
            now,
        )
        .await
        .map_err(|e| match e {
            // Lost race surfaced by the partial unique index
            RepoError::Duplicate(_) => SeatingError::SeatConflict,
            other => other.into(),
        })?;

        let order = self
            .insert_order_with_fresh_no(&mut tx, |no| OrderCreate {
                no,
                holder_id: req.holder_id.clone(),
                book_id: Some(booking.id),
                lock_id: None,
                total_amount: req.total_amount,
                guest_name: req.guest_name.clone(),
                guest_phone: req.guest_phone.clone(),
                guest_id_card: req.guest_id_card.clone(),
                arrival_time: Some(req.arrival_time),
                items: Vec::new(),
                total_count: None,
                remark: None,
            })
            .await?;

        tx.commit()
            .await
            .map_err(|e| SeatingError::Store(e.to_string()))?;

        info!(
            order_id = order.id,
            order_no = %order.no,
            seat_id = seat.id,
            date_bucket = %date_bucket,
            "Booking created, awaiting payment"
        );

        Ok(CreateBookingOutcome {
            order_id: order.id,
            order_no: order.no,
            book_id: booking.id,
        })
    }

    /// Create a walk-in order with its advisory lock.
    ///
    /// Not one transaction: the lock insert and the order insert are
    /// separate writes, so an order failure leaves an orphan lock unless the
    /// compensation step removes it. That compensation is part of this
    /// method's contract.
    pub async fn create_walk_in(
        &self,
        req: CreateWalkInRequest,
    ) -> Result<CreateWalkInOutcome, SeatingError> {
        if req.holder_id.trim().is_empty() {
            return Err(SeatingError::Validation("holder_id is required".into()));
        }
        if req.items.is_empty() {
            return Err(SeatingError::Validation("cart is empty".into()));
        }
        if req.total_amount < 0.0 {
            return Err(SeatingError::Validation(
                "total_amount cannot be negative".into(),
            ));
        }

        // One pending order per holder
        if let Some(existing) = order_repo::find_pending_by_holder(&self.pool, &req.holder_id)
            .await
            .map_err(SeatingError::from)?
        {
            return Err(SeatingError::AlreadyPending {
                order_id: existing.id,
                order_no: existing.no,
            });
        }

        let seat = seat_repo::find_by_code(&self.pool, &req.seat_code)
            .await
            .map_err(SeatingError::from)?
            .ok_or_else(|| {
                SeatingError::Validation(format!("Unknown seat code {}", req.seat_code))
            })?;

        let now = now_millis();
        let date_bucket = time::today_bucket(self.tz);
        let lock = lock_repo::create(
            &self.pool,
            SeatLockCreate {
                seat_id: seat.id,
                holder_id: req.holder_id.clone(),
                date_bucket: date_bucket.clone(),
            },
            now,
        )
        .await
        .map_err(SeatingError::from)?;

        match self.finish_walk_in(&req, lock.id, now).await {
            Ok(order) => {
                info!(
                    order_id = order.id,
                    order_no = %order.no,
                    lock_id = lock.id,
                    seat_id = seat.id,
                    "Walk-in order created, awaiting payment"
                );
                Ok(CreateWalkInOutcome {
                    order_id: order.id,
                    order_no: order.no,
                    lock_id: lock.id,
                })
            }
            Err(e) => {
                // Compensation: the lock must not outlive the failed order.
                // Best-effort — a failed cleanup is logged for out-of-band
                // repair, not retried forever.
                match lock_repo::delete(&self.pool, lock.id).await {
                    Ok(_) => {
                        warn!(lock_id = lock.id, "Walk-in failed, orphan lock removed");
                    }
                    Err(cleanup) => {
                        error!(
                            lock_id = lock.id,
                            error = %cleanup,
                            "Walk-in failed AND lock cleanup failed, manual repair needed"
                        );
                    }
                }
                Err(e)
            }
        }
    }

    async fn finish_walk_in(
        &self,
        req: &CreateWalkInRequest,
        lock_id: i64,
        now: i64,
    ) -> Result<Order, SeatingError> {
        // The check-then-use race on `no`: an insert collision is retryable
        // within the same attempt budget as generation itself
        let budget = self.order_no.max_attempts();
        for attempt in 0..budget {
            let mut conn = self
                .pool
                .acquire()
                .await
                .map_err(|e| SeatingError::Store(e.to_string()))?;
            let no = self.order_no.next(&mut conn).await?;
            drop(conn);

            let create = OrderCreate {
                no,
                holder_id: req.holder_id.clone(),
                book_id: None,
                lock_id: Some(lock_id),
                total_amount: req.total_amount,
                guest_name: None,
                guest_phone: None,
                guest_id_card: None,
                arrival_time: None,
                items: req.items.clone(),
                total_count: req.total_count,
                remark: req.remark.clone(),
            };

            match order_repo::create(&self.pool, create, now).await {
                Ok(order) => return Ok(order),
                Err(RepoError::Duplicate(msg)) => {
                    warn!(
                        attempt = attempt + 1,
                        detail = %msg,
                        "Order number collided on insert, regenerating"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(SeatingError::IdExhausted)
    }

    /// Generate an order number and insert the order, retrying on a `no`
    /// collision within the generator's budget. Runs on the claim
    /// transaction.
    async fn insert_order_with_fresh_no(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        make_create: impl Fn(String) -> OrderCreate,
    ) -> Result<Order, SeatingError> {
        let now = now_millis();
        let budget = self.order_no.max_attempts();
        for attempt in 0..budget {
            let no = self.order_no.next(&mut **tx).await?;
            match order_repo::create(&mut **tx, make_create(no), now).await {
                Ok(order) => return Ok(order),
                Err(RepoError::Duplicate(msg)) => {
                    // Another writer committed this number after our
                    // in-transaction existence check; retryable
                    warn!(
                        attempt = attempt + 1,
                        detail = %msg,
                        "Order number collided on insert, regenerating"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(SeatingError::IdExhausted)
    }
}

impl std::fmt::Debug for ReservationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationCoordinator")
            .field("tz", &self.tz)
            .field("order_no", &self.order_no)
            .finish()
    }
}
