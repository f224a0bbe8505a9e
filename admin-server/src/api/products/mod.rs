//! Product API Module
//!
//! Product provisioning creates the 12 fixed size rows (34-45) alongside
//! the product; updates may replace them wholesale.

mod handler;

use axum::{
    Router,
    routing::get,
};

use crate::core::ServerState;

/// Product router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/sizes", get(handler::list_sizes))
}
