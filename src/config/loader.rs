//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `FOLIO_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `FOLIO_SERVER__PORT=8080`
/// - `FOLIO_STORAGE__UPLOAD_DIR=/data/uploads`
/// - `FOLIO_SUMMARY__API_KEY=sk-...`
/// - `FOLIO_DATABASE__PATH=/data/folio.db`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("database.path", "data/folio.db")?
        .set_default("database.max_connections", 5)?
        .set_default("storage.upload_dir", "data/uploads")?
        .set_default("storage.max_upload_size", 50 * 1024 * 1024)?
        .set_default("summary.base_url", "https://api.groq.com/openai/v1")?
        .set_default("summary.api_key", "")?
        .set_default("summary.model", "gemma2-9b-it")?
        .set_default("summary.timeout_secs", 60)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 例如: FOLIO_SUMMARY__MODEL=llama3-8b-8192
    builder = builder.add_source(
        Environment::with_prefix("FOLIO")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.database.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    if config.storage.upload_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Upload directory cannot be empty".to_string(),
        ));
    }

    if config.storage.max_upload_size == 0 {
        return Err(ConfigError::ValidationError(
            "Max upload size cannot be 0".to_string(),
        ));
    }

    if config.summary.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Summary base URL cannot be empty".to_string(),
        ));
    }

    if config.summary.model.is_empty() {
        return Err(ConfigError::ValidationError(
            "Summary model cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Database: {}", config.database.path);
    tracing::info!("Database Max Connections: {}", config.database.max_connections);
    tracing::info!("Upload Directory: {:?}", config.storage.upload_dir);
    tracing::info!("Max Upload Size: {} bytes", config.storage.max_upload_size);
    tracing::info!("Summary URL: {}", config.summary.base_url);
    tracing::info!("Summary Model: {}", config.summary.model);
    tracing::info!("Summary API Key: {}", if config.summary.has_api_key() { "set" } else { "not set" });
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
