use std::sync::Arc;

use crate::core::Config;
use crate::orders::OrderManager;
use crate::store::{MemoryStore, Store, SurrealStore};
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝；所有行级访问经由 `store`，
/// 所有订单/库存变更经由 `manager`。
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub store: Arc<dyn Store>,
    pub manager: Arc<OrderManager>,
}

impl ServerState {
    /// 按配置打开存储后端并装配生命周期管理器
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let store: Arc<dyn Store> = match config.store_backend.as_str() {
            "memory" => {
                tracing::warn!("Using in-memory store; data will not survive a restart");
                Arc::new(MemoryStore::new())
            }
            "rocksdb" => Arc::new(SurrealStore::open(&config.data_dir).await?),
            other => {
                return Err(AppError::internal(format!(
                    "unknown store backend: {}",
                    other
                )));
            }
        };

        Ok(Self::with_store(config.clone(), store))
    }

    /// Assemble state around an existing store (tests, in-process runs)
    pub fn with_store(config: Config, store: Arc<dyn Store>) -> Self {
        let manager = Arc::new(OrderManager::new(store.clone()));
        Self {
            config: Arc::new(config),
            store,
            manager,
        }
    }
}
