use admin_server::{Config, Server, ServerState, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 环境与日志
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    tracing::info!(
        environment = %config.environment,
        backend = %config.store_backend,
        "Back office server starting"
    );

    // 2. 初始化状态 (打开存储、装配管理器)
    let state = ServerState::initialize(&config)
        .await
        .map_err(|e| anyhow::anyhow!("initialization failed: {e}"))?;

    // 3. 启动 HTTP 服务器
    Server::with_state(config, state).run().await
}
