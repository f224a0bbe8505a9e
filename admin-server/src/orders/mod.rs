//! Order Lifecycle
//!
//! Orchestrates order creation (validate → persist → reserve → recompute)
//! and cancellation (release → recompute → transition), plus the hard
//! purge variant and the status transition guards.

pub mod error;
pub mod manager;

pub use error::{OrderError, OrderResult};
pub use manager::{OrderItemRequest, OrderManager, OrderRequest, StockLevel};
