//! Order API Module
//!
//! All mutations go through the OrderManager; handlers only marshal JSON.

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // Stock validation pass, no mutation
        .route("/check-inventory", post(handler::check_inventory))
        // Soft cancel (restores stock, keeps rows)
        .route("/cancel", post(handler::cancel))
        // Hard delete, separate administrative action
        .route("/purge", post(handler::purge))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}/cancel-request", post(handler::resolve_cancel_request))
}
