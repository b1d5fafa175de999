//! Seat Booking Repository

use super::RepoResult;
use shared::models::{ClaimStatus, SeatBooking, SeatBookingCreate};
use shared::util::snowflake_id;
use sqlx::SqliteExecutor;

const COLUMNS: &str =
    "id, seat_id, holder_id, arrival_time, date_bucket, status, created_at, updated_at";

/// All ACTIVE bookings for one (seat, venue-local day)
pub async fn find_active_in_bucket<'e, E>(
    executor: E,
    seat_id: i64,
    date_bucket: &str,
) -> RepoResult<Vec<SeatBooking>>
where
    E: SqliteExecutor<'e>,
{
    let bookings = sqlx::query_as::<_, SeatBooking>(&format!(
        "SELECT {COLUMNS} FROM seat_booking WHERE seat_id = ? AND date_bucket = ? AND status = ? ORDER BY created_at DESC"
    ))
    .bind(seat_id)
    .bind(date_bucket)
    .bind(ClaimStatus::Active)
    .fetch_all(executor)
    .await?;
    Ok(bookings)
}

/// Insert an ACTIVE booking. A lost race on (seat_id, date_bucket) surfaces
/// as `RepoError::Duplicate` via the partial unique index.
pub async fn create<'e, E>(executor: E, data: SeatBookingCreate, now: i64) -> RepoResult<SeatBooking>
where
    E: SqliteExecutor<'e>,
{
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO seat_booking (id, seat_id, holder_id, arrival_time, date_bucket, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.seat_id)
    .bind(&data.holder_id)
    .bind(data.arrival_time)
    .bind(&data.date_bucket)
    .bind(ClaimStatus::Active)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(SeatBooking {
        id,
        seat_id: data.seat_id,
        holder_id: data.holder_id,
        arrival_time: data.arrival_time,
        date_bucket: data.date_bucket,
        status: ClaimStatus::Active,
        created_at: now,
        updated_at: now,
    })
}

/// Flip an ACTIVE booking to INVALIDATED. Returns false if the booking was
/// missing or already invalidated.
pub async fn invalidate<'e, E>(executor: E, id: i64, now: i64) -> RepoResult<bool>
where
    E: SqliteExecutor<'e>,
{
    let rows =
        sqlx::query("UPDATE seat_booking SET status = ?, updated_at = ? WHERE id = ? AND status = ?")
            .bind(ClaimStatus::Invalidated)
            .bind(now)
            .bind(id)
            .bind(ClaimStatus::Active)
            .execute(executor)
            .await?;
    Ok(rows.rows_affected() > 0)
}
