//! Seat API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/seats", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // 扫码点餐入口：按座位编码查当日可用状态
        .route("/{code}/status", get(handler::check_status))
}
