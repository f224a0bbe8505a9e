//! API 路由模块
//!
//! # 结构
//!
//! - [`orders`] - 订单生命周期接口
//! - [`products`] - 商品与库存接口

pub mod orders;
pub mod products;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
