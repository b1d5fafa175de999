//! Seat Repository
//!
//! Catalog reads plus the admin create. The claim path only ever reads here.

use super::{RepoError, RepoResult};
use shared::models::{Seat, SeatCreate};
use shared::util::snowflake_id;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, name, description, seat_type, capacity, is_active";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Seat>> {
    let seats = sqlx::query_as::<_, Seat>(&format!(
        "SELECT {COLUMNS} FROM seat WHERE is_active = 1 ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(seats)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Seat>> {
    let seat = sqlx::query_as::<_, Seat>(&format!("SELECT {COLUMNS} FROM seat WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(seat)
}

/// Look up a seat by its human-facing code (the `name` column)
pub async fn find_by_code(pool: &SqlitePool, code: &str) -> RepoResult<Option<Seat>> {
    let seat = sqlx::query_as::<_, Seat>(&format!(
        "SELECT {COLUMNS} FROM seat WHERE name = ? AND is_active = 1 LIMIT 1"
    ))
    .bind(code)
    .fetch_optional(pool)
    .await?;
    Ok(seat)
}

pub async fn create(pool: &SqlitePool, data: SeatCreate) -> RepoResult<Seat> {
    let id = snowflake_id();
    let capacity = data.capacity.unwrap_or(2);
    sqlx::query(
        "INSERT INTO seat (id, name, description, seat_type, capacity, is_active) VALUES (?, ?, ?, ?, ?, 1)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.seat_type)
    .bind(capacity)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create seat".into()))
}
