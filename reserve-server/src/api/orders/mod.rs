//! Order API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        // Walk-in ordering (creates the advisory seat lock)
        .route("/walk-in", post(handler::create_walk_in))
        // Holder's order history
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        // Lifecycle
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/pay", post(handler::pay))
}
