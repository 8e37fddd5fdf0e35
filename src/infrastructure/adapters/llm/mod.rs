//! LLM Adapter - 章节摘要生成

mod fixed_summarizer;
mod http_summarizer;

pub use fixed_summarizer::FixedSummarizer;
pub use http_summarizer::*;
