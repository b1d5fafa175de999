//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::order as order_repo;
use crate::seating::CreateWalkInRequest;
use crate::utils::{AppError, AppResponse, AppResult, ok_with_message};
use shared::models::{Order, OrderItem, OrderStatus};

#[derive(Debug, Deserialize, Validate)]
pub struct WalkInPayload {
    #[validate(length(min = 1, max = 32))]
    pub seat_code: String,
    #[validate(length(min = 1))]
    pub holder_id: String,
    #[validate(length(min = 1))]
    pub items: Vec<OrderItem>,
    #[validate(range(min = 0.0))]
    pub total_amount: f64,
    pub total_count: Option<i32>,
    #[validate(length(max = 200))]
    pub remark: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WalkInResponse {
    pub order_id: i64,
    pub order_no: String,
    pub lock_id: i64,
}

/// POST /api/orders/walk-in - 堂食下单 (扫码点餐)
pub async fn create_walk_in(
    State(state): State<ServerState>,
    Json(payload): Json<WalkInPayload>,
) -> AppResult<Json<AppResponse<WalkInResponse>>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let outcome = state
        .coordinator
        .create_walk_in(CreateWalkInRequest {
            seat_code: payload.seat_code,
            holder_id: payload.holder_id,
            items: payload.items,
            total_amount: payload.total_amount,
            total_count: payload.total_count,
            remark: payload.remark,
        })
        .await?;

    Ok(ok_with_message(
        WalkInResponse {
            order_id: outcome.order_id,
            order_no: outcome.order_no,
            lock_id: outcome.lock_id,
        },
        "Order created, awaiting payment",
    ))
}

#[derive(Debug, Deserialize)]
pub struct HolderPayload {
    pub holder_id: String,
}

/// POST /api/orders/{id}/cancel - 取消待支付订单
///
/// 同一事务内使关联的预订/锁定记录失效。
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<HolderPayload>,
) -> AppResult<Json<AppResponse<()>>> {
    state.lifecycle.cancel_order(id, &payload.holder_id).await?;
    Ok(ok_with_message((), "Order cancelled"))
}

#[derive(Debug, Deserialize, Validate)]
pub struct PayPayload {
    #[validate(length(min = 1))]
    pub holder_id: String,
    #[validate(range(min = 0.01))]
    pub amount: f64,
    pub method: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub order_no: String,
    pub paid_amount: f64,
    pub transaction_id: String,
}

/// POST /api/orders/{id}/pay - 模拟支付
pub async fn pay(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<PayPayload>,
) -> AppResult<Json<AppResponse<PaymentResponse>>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let method = payload.method.as_deref().unwrap_or("ONLINE");
    let outcome = state
        .lifecycle
        .complete_payment(id, &payload.holder_id, payload.amount, method)
        .await?;

    Ok(ok_with_message(
        PaymentResponse {
            order_no: outcome.order_no,
            paid_amount: outcome.paid_amount,
            transaction_id: outcome.transaction_id,
        },
        "Payment completed",
    ))
}

#[derive(Debug, Deserialize)]
pub struct OrderQuery {
    pub holder_id: String,
    pub status: Option<OrderStatus>,
}

/// GET /api/orders?holder_id=&status= - 订单历史
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderQuery>,
) -> AppResult<Json<Vec<Order>>> {
    if query.holder_id.trim().is_empty() {
        return Err(AppError::Validation("holder_id is required".into()));
    }
    let orders = order_repo::find_by_holder(state.pool(), &query.holder_id, query.status).await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id}?holder_id= - 订单详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<HolderPayload>,
) -> AppResult<Json<Order>> {
    let order = order_repo::find_by_id(state.pool(), id)
        .await?
        .filter(|o| o.holder_id == query.holder_id)
        .ok_or_else(|| AppError::NotFound(format!("Order {id} not found")))?;
    Ok(Json(order))
}
