//! 主应用程序入口
//!
//! 启动用户服务的 Axum Web API。

use std::sync::Arc;

use application::{SystemClock, UserService, UserServiceDependencies};
use config::AppConfig;
use infrastructure::{create_pg_pool, KafkaEventPublisher, PgUserRepository, ShaBcryptHasher};
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 本地开发时先加载 .env，再读取环境变量
    let _ = dotenvy::dotenv();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 读取环境变量配置，关键项缺失时启动直接失败
    let app_config = AppConfig::from_env();
    let database_url = app_config.database.url();

    tracing::info!(
        "连接数据库: {}",
        database_url.split('@').last().unwrap_or("unknown")
    );

    let pg_pool = create_pg_pool(&database_url, app_config.database.max_connections).await?;

    // 运行迁移
    sqlx::migrate!("../../migrations").run(&pg_pool).await?;

    let user_repository = PgUserRepository::new(pg_pool);
    let password_hasher = ShaBcryptHasher::new(app_config.server.bcrypt_cost);
    let event_publisher = KafkaEventPublisher::new(app_config.kafka.clone());

    // 创建应用层服务
    let user_service = UserService::new(UserServiceDependencies {
        user_repository: Arc::new(user_repository),
        password_hasher: Arc::new(password_hasher),
        event_publisher: Arc::new(event_publisher),
        clock: Arc::new(SystemClock),
    });

    let state = AppState::new(Arc::new(user_service));

    // 启动 Web 服务器
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&app_config.server.address).await?;

    tracing::info!("用户服务启动在 http://{}", app_config.server.address);
    axum::serve(listener, app).await?;

    Ok(())
}
