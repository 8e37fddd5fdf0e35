//! File Storage - 文件系统上传存储实现
//!
//! 实现 UploadStoragePort trait，文件名为 `<uuid>.epub`

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::{StorageError, UploadStoragePort};

/// 文件系统上传存储
pub struct FileUploadStorage {
    /// 存储根目录
    base_dir: PathBuf,
}

impl FileUploadStorage {
    /// 创建新的文件存储
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        Ok(Self { base_dir })
    }

    /// 获取存储根目录
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[async_trait]
impl UploadStoragePort for FileUploadStorage {
    async fn save(&self, data: &[u8]) -> Result<PathBuf, StorageError> {
        let path = self.base_dir.join(format!("{}.epub", Uuid::new_v4()));

        fs::write(&path, data)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        tracing::debug!(path = %path.display(), size = data.len(), "Saved upload");

        Ok(path)
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        match fs::read(path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::FileNotFound(
                path.to_string_lossy().to_string(),
            )),
            Err(e) => Err(StorageError::IoError(e.to_string())),
        }
    }

    async fn delete(&self, path: &Path) -> Result<(), StorageError> {
        match fs::remove_file(path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Deleted upload");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::IoError(e.to_string())),
        }
    }
}
