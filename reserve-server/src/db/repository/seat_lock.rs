//! Seat Lock Repository
//!
//! Executor-generic so the same queries run on the pool or inside a
//! coordinator transaction.

use super::RepoResult;
use shared::models::{ClaimStatus, SeatLock, SeatLockCreate};
use shared::util::snowflake_id;
use sqlx::SqliteExecutor;

const COLUMNS: &str = "id, seat_id, holder_id, date_bucket, status, created_at, updated_at";

/// All ACTIVE locks for one (seat, venue-local day)
pub async fn find_active_in_bucket<'e, E>(
    executor: E,
    seat_id: i64,
    date_bucket: &str,
) -> RepoResult<Vec<SeatLock>>
where
    E: SqliteExecutor<'e>,
{
    let locks = sqlx::query_as::<_, SeatLock>(&format!(
        "SELECT {COLUMNS} FROM seat_lock WHERE seat_id = ? AND date_bucket = ? AND status = ? ORDER BY created_at DESC"
    ))
    .bind(seat_id)
    .bind(date_bucket)
    .bind(ClaimStatus::Active)
    .fetch_all(executor)
    .await?;
    Ok(locks)
}

pub async fn create<'e, E>(executor: E, data: SeatLockCreate, now: i64) -> RepoResult<SeatLock>
where
    E: SqliteExecutor<'e>,
{
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO seat_lock (id, seat_id, holder_id, date_bucket, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.seat_id)
    .bind(&data.holder_id)
    .bind(&data.date_bucket)
    .bind(ClaimStatus::Active)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(SeatLock {
        id,
        seat_id: data.seat_id,
        holder_id: data.holder_id,
        date_bucket: data.date_bucket,
        status: ClaimStatus::Active,
        created_at: now,
        updated_at: now,
    })
}

/// Flip an ACTIVE lock to INVALIDATED. Returns false if the lock was
/// missing or already invalidated.
pub async fn invalidate<'e, E>(executor: E, id: i64, now: i64) -> RepoResult<bool>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query("UPDATE seat_lock SET status = ?, updated_at = ? WHERE id = ? AND status = ?")
        .bind(ClaimStatus::Invalidated)
        .bind(now)
        .bind(id)
        .bind(ClaimStatus::Active)
        .execute(executor)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Physically remove a lock row (walk-in compensation path only)
pub async fn delete<'e, E>(executor: E, id: i64) -> RepoResult<bool>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query("DELETE FROM seat_lock WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(rows.rows_affected() > 0)
}
