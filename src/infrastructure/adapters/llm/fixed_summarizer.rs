//! Fixed Summarizer - 不调用外部服务的摘要实现
//!
//! 未配置 API key 时使用，测试中也使用

use async_trait::async_trait;

use crate::application::ports::{SummarizerPort, SummaryError};

/// 始终返回固定摘要
pub struct FixedSummarizer {
    summary: String,
}

impl FixedSummarizer {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
        }
    }
}

impl Default for FixedSummarizer {
    fn default() -> Self {
        Self::new("Summary generation is not configured.")
    }
}

#[async_trait]
impl SummarizerPort for FixedSummarizer {
    async fn summarize(&self, content: &str) -> Result<String, SummaryError> {
        tracing::debug!(
            content_chars = content.chars().count(),
            "FixedSummarizer: returning fixed summary"
        );
        Ok(self.summary.clone())
    }
}
