//! Booking API Handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::ServerState;
use crate::seating::CreateBookingRequest;
use crate::utils::{AppError, AppResponse, AppResult, ok_with_message, time};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingPayload {
    pub seat_id: i64,
    #[validate(length(min = 1))]
    pub holder_id: String,
    /// 营业时区到店时间 "YYYY-MM-DD HH:MM:SS"
    pub arrival_time: String,
    pub guest_name: Option<String>,
    #[validate(length(max = 20))]
    pub guest_phone: Option<String>,
    #[validate(length(max = 32))]
    pub guest_id_card: Option<String>,
    #[validate(range(min = 0.0))]
    pub total_amount: f64,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub order_id: i64,
    pub order_no: String,
    pub book_id: i64,
}

/// POST /api/bookings - 预订座位并创建待支付订单
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateBookingPayload>,
) -> AppResult<Json<AppResponse<BookingResponse>>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    // 日期字符串 → 营业时区时间戳，转换留在 handler 层
    let arrival_time = time::parse_venue_datetime(&payload.arrival_time, state.config.venue_tz)
        .ok_or_else(|| {
            AppError::Validation(format!("Invalid arrival_time: {}", payload.arrival_time))
        })?;

    let outcome = state
        .coordinator
        .create_booking(CreateBookingRequest {
            seat_id: payload.seat_id,
            holder_id: payload.holder_id,
            arrival_time,
            guest_name: payload.guest_name,
            guest_phone: payload.guest_phone,
            guest_id_card: payload.guest_id_card,
            total_amount: payload.total_amount,
        })
        .await?;

    Ok(ok_with_message(
        BookingResponse {
            order_id: outcome.order_id,
            order_no: outcome.order_no,
            book_id: outcome.book_id,
        },
        "Booking created, awaiting payment",
    ))
}
