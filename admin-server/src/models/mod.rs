//! Data Models
//!
//! Row types for the four tables the back office core touches:
//! `product`, `product_size`, `order`, `order_item`.

pub mod order;
pub mod product;

pub use order::{Order, OrderItem, OrderStatus};
pub use product::{Product, ProductCreate, ProductSize, ProductUpdate, SIZE_RANGE};
