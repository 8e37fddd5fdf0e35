//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::{RepositoryError, StorageError, SummaryError};
use crate::domain::epub::UnreadablePackageError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: i64,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 包无法读取
    #[error("Unreadable package: {0}")]
    UnreadablePackage(String),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: i64) -> Self {
        Self::NotFound { resource_type, id }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        Self::RepositoryError(err.to_string())
    }
}

impl From<StorageError> for ApplicationError {
    fn from(err: StorageError) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<SummaryError> for ApplicationError {
    fn from(err: SummaryError) -> Self {
        Self::ExternalServiceError(err.to_string())
    }
}

impl From<UnreadablePackageError> for ApplicationError {
    fn from(err: UnreadablePackageError) -> Self {
        Self::UnreadablePackage(err.to_string())
    }
}
