//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 上传存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 摘要服务配置
    #[serde(default)]
    pub summary: SummaryConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/folio.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// 获取数据库 URL
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.path)
    }
}

/// 上传存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// EPUB 上传目录
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// 上传文件最大大小（字节），默认 50MB
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("data/uploads")
}

fn default_max_upload_size() -> u64 {
    50 * 1024 * 1024
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

/// 摘要服务配置（OpenAI 兼容接口）
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryConfig {
    /// API 基础 URL
    #[serde(default = "default_summary_url")]
    pub base_url: String,

    /// API Key，为空时使用固定摘要
    #[serde(default)]
    pub api_key: String,

    /// 模型名称
    #[serde(default = "default_summary_model")]
    pub model: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_summary_timeout")]
    pub timeout_secs: u64,
}

fn default_summary_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_summary_model() -> String {
    "gemma2-9b-it".to_string()
}

fn default_summary_timeout() -> u64 {
    60
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            base_url: default_summary_url(),
            api_key: String::new(),
            model: default_summary_model(),
            timeout_secs: default_summary_timeout(),
        }
    }
}

impl SummaryConfig {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.path, "data/folio.db");
        assert_eq!(config.storage.upload_dir, PathBuf::from("data/uploads"));
        assert_eq!(config.summary.model, "gemma2-9b-it");
        assert!(!config.summary.has_api_key());
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_database_url() {
        let config = DatabaseConfig::default();
        assert_eq!(config.database_url(), "sqlite:data/folio.db?mode=rwc");
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let mut config = SummaryConfig::default();
        config.api_key = "   ".to_string();
        assert!(!config.has_api_key());

        config.api_key = "sk-test".to_string();
        assert!(config.has_api_key());
    }
}
