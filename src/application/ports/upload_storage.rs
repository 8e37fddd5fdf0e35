//! Upload Storage Port - 出站端口
//!
//! 上传文件的持久化抽象，根目录由配置注入

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Upload Storage Port
#[async_trait]
pub trait UploadStoragePort: Send + Sync {
    /// 保存上传的包，返回存储路径
    async fn save(&self, data: &[u8]) -> Result<PathBuf, StorageError>;

    /// 读取已存储的包
    async fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError>;

    /// 删除已存储的包（不存在时视为成功）
    async fn delete(&self, path: &Path) -> Result<(), StorageError>;
}
