//! Summarizer Port - 章节摘要生成抽象
//!
//! 具体实现在 infrastructure/adapters/llm

use async_trait::async_trait;
use thiserror::Error;

/// 摘要错误
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Summarizer Port
#[async_trait]
pub trait SummarizerPort: Send + Sync {
    /// 为章节正文生成摘要
    async fn summarize(&self, content: &str) -> Result<String, SummaryError>;
}
