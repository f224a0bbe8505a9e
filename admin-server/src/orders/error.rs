//! Lifecycle error taxonomy
//!
//! Validation failures (insufficient stock, bad transitions) are expected,
//! recoverable-by-caller conditions; store failures are a distinct category
//! that triggers the compensation paths in the manager.

use thiserror::Error;

use crate::inventory::LedgerError;
use crate::store::StoreError;

/// Manager errors surfaced to the HTTP handlers
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Insufficient stock for product {product} size {size}: requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        size: i32,
        requested: i32,
        available: i32,
    },

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("No size row for product {product} size {size}")]
    SizeNotFound { product: String, size: i32 },

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type OrderResult<T> = Result<T, OrderError>;

impl From<LedgerError> for OrderError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientStock {
                product,
                size,
                requested,
                available,
            } => OrderError::InsufficientStock {
                product,
                size,
                requested,
                available,
            },
            LedgerError::SizeNotFound { product, size } => {
                OrderError::SizeNotFound { product, size }
            }
            LedgerError::ProductNotFound(id) => OrderError::ProductNotFound(id),
            LedgerError::Store(e) => OrderError::Store(e),
        }
    }
}
