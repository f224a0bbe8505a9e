//! Shoe-store Back Office - order lifecycle and inventory reconciliation
//!
//! # 架构概述
//!
//! - **存储网关** (`store`): 抽象行级访问，SurrealDB 与内存后端
//! - **库存账本** (`inventory`): 尺码库存与聚合总量的唯一写入方
//! - **订单生命周期** (`orders`): 创建/取消/清除与状态流转
//! - **HTTP API** (`api`): 薄处理器，只做 JSON 编解
//!
//! # 模块结构
//!
//! ```text
//! admin-server/src/
//! ├── core/          # 配置、状态、服务器启动
//! ├── api/           # HTTP 路由和处理器
//! ├── orders/        # 订单生命周期管理器
//! ├── inventory/     # 库存账本
//! ├── store/         # 数据存储网关
//! ├── models/        # 行模型
//! └── utils/         # 错误、日志
//! ```

pub mod api;
pub mod core;
pub mod inventory;
pub mod models;
pub mod orders;
pub mod store;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState, build_router};
pub use inventory::InventoryLedger;
pub use models::{Order, OrderItem, OrderStatus, Product, ProductSize};
pub use orders::{OrderError, OrderManager};
pub use store::{MemoryStore, Store, StoreError, SurrealStore};
pub use utils::{AppError, AppResult};
pub use utils::logger::{init_logger, init_logger_with_file};
