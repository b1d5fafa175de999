//! Seat API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::{seat as seat_repo, seat_booking as booking_repo, seat_lock as lock_repo};
use crate::seating::availability;
use crate::utils::{AppError, AppResponse, AppResult, ok, time};
use shared::models::{Availability, Seat, SeatCreate};
use shared::util::now_millis;

/// GET /api/seats - 座位目录
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Seat>>> {
    let seats = seat_repo::find_all(state.pool()).await?;
    Ok(Json(seats))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSeatPayload {
    #[validate(length(min = 1, max = 32))]
    pub name: String,
    pub description: Option<String>,
    pub seat_type: shared::models::SeatType,
    #[validate(range(min = 1, max = 64))]
    pub capacity: Option<i32>,
}

/// POST /api/seats - 新增座位 (管理端)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateSeatPayload>,
) -> AppResult<Json<Seat>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let seat = seat_repo::create(
        state.pool(),
        SeatCreate {
            name: payload.name,
            description: payload.description,
            seat_type: payload.seat_type,
            capacity: payload.capacity,
        },
    )
    .await?;
    Ok(Json(seat))
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub holder_id: String,
}

/// GET /api/seats/{code}/status - 当日可用状态
///
/// 只读：查出当日 ACTIVE 预订/锁定记录后交给 resolver 判定。
pub async fn check_status(
    State(state): State<ServerState>,
    Path(code): Path<String>,
    Query(query): Query<StatusQuery>,
) -> AppResult<Json<AppResponse<Availability>>> {
    if query.holder_id.trim().is_empty() {
        return Err(AppError::Validation("holder_id is required".into()));
    }

    let seat = seat_repo::find_by_code(state.pool(), &code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Seat {code} not found")))?;

    let tz = state.config.venue_tz;
    let bucket = time::today_bucket(tz);
    let bookings = booking_repo::find_active_in_bucket(state.pool(), seat.id, &bucket).await?;
    let locks = lock_repo::find_active_in_bucket(state.pool(), seat.id, &bucket).await?;

    let result = availability::resolve(
        &bookings,
        &locks,
        &query.holder_id,
        now_millis(),
        state.config.grace_ms(),
    );

    Ok(ok(result))
}
