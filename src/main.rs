//! Folio - EPUB 章节切分服务
//!
//! 启动流程: 配置 → 日志 → 数据库 → 适配器 → HTTP 服务

use std::sync::Arc;

use folio::application::SummarizerPort;
use folio::config::{load_config, print_config, LogConfig};
use folio::infrastructure::adapters::{
    FileUploadStorage, FixedSummarizer, HttpSummarizer, HttpSummarizerConfig,
};
use folio::infrastructure::http::{AppState, HttpServer, ServerConfig};
use folio::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteBookRepository,
};

/// multipart 边界和其他字段的额外空间
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

fn init_tracing(log: &LogConfig) {
    let log_filter = format!("{},folio={},tower_http=debug", log.level, log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);

    tracing::info!("Folio - EPUB chapter extraction service");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    let book_repo = Arc::new(SqliteBookRepository::new(pool));
    let storage = Arc::new(FileUploadStorage::new(&config.storage.upload_dir).await?);

    let summarizer: Arc<dyn SummarizerPort> = if config.summary.has_api_key() {
        let summary_config =
            HttpSummarizerConfig::new(&config.summary.base_url, &config.summary.api_key)
                .with_model(&config.summary.model)
                .with_timeout(config.summary.timeout_secs);
        Arc::new(HttpSummarizer::new(summary_config)?)
    } else {
        tracing::warn!("No summary API key configured, using fixed summaries");
        Arc::new(FixedSummarizer::default())
    };

    let state = AppState::new(
        book_repo,
        storage,
        summarizer,
        config.storage.max_upload_size,
    );

    let body_limit = usize::try_from(config.storage.max_upload_size)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);
    let server_config =
        ServerConfig::new(&config.server.host, config.server.port).with_body_limit(body_limit);

    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    server
        .run_with_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("Received shutdown signal"),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to listen for shutdown signal");
                    std::future::pending::<()>().await;
                }
            }
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
