//! Data Store Gateway
//!
//! All mutation in the system goes through the [`Store`] trait; no component
//! holds row state in memory across requests. Each call is an independent
//! read or write against the backend — the gateway offers no cross-call
//! transaction, which is exactly the consistency model the lifecycle layer
//! is written against.

pub mod memory;
pub mod surreal;

pub use memory::MemoryStore;
pub use surreal::SurrealStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Order, OrderItem, OrderStatus, Product, ProductSize, ProductUpdate};

/// Gateway error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<surrealdb::Error> for StoreError {
    fn from(err: surrealdb::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

/// Result type for gateway operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Row-level access to the four back-office tables.
///
/// Update methods return `NotFound` when the targeted row does not exist.
/// Delete methods are no-ops on missing rows — the creation rollback path
/// relies on being able to re-issue deletes safely.
#[async_trait]
pub trait Store: Send + Sync {
    // ========== product ==========
    async fn insert_product(&self, product: Product) -> StoreResult<Product>;
    async fn get_product(&self, id: &str) -> StoreResult<Option<Product>>;
    async fn list_products(&self) -> StoreResult<Vec<Product>>;
    async fn update_product(&self, id: &str, update: ProductUpdate) -> StoreResult<Product>;
    async fn set_product_max_quantity(&self, id: &str, max_quantity: i32) -> StoreResult<()>;
    async fn delete_product(&self, id: &str) -> StoreResult<()>;

    // ========== product_size ==========
    async fn insert_size_rows(&self, rows: Vec<ProductSize>) -> StoreResult<()>;
    async fn get_size(&self, product: &str, size: i32) -> StoreResult<Option<ProductSize>>;
    async fn sizes_for_product(&self, product: &str) -> StoreResult<Vec<ProductSize>>;
    async fn set_size_quantity(&self, product: &str, size: i32, quantity: i32) -> StoreResult<()>;
    async fn delete_size_rows(&self, product: &str) -> StoreResult<()>;

    // ========== order ==========
    async fn insert_order(&self, order: Order) -> StoreResult<Order>;
    async fn get_order(&self, id: &str) -> StoreResult<Option<Order>>;
    async fn get_order_by_slug(&self, slug: &str) -> StoreResult<Option<Order>>;
    async fn list_orders(&self) -> StoreResult<Vec<Order>>;
    async fn set_order_status(&self, id: &str, status: OrderStatus) -> StoreResult<()>;
    async fn delete_order(&self, id: &str) -> StoreResult<()>;

    // ========== order_item ==========
    async fn insert_order_items(&self, items: Vec<OrderItem>) -> StoreResult<()>;
    async fn items_for_order(&self, order_id: &str) -> StoreResult<Vec<OrderItem>>;
    async fn delete_order_items(&self, order_id: &str) -> StoreResult<()>;
}
