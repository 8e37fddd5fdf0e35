//! HTTP Summarizer - 调用 OpenAI 兼容的 chat completions 接口
//!
//! 实现 SummarizerPort trait
//!
//! 外部 API:
//! POST {base_url}/chat/completions
//! Authorization: Bearer {api_key}
//! Request: {"model": "...", "messages": [...], "temperature": 0, "max_tokens": 1000}
//! Response: {"choices": [{"message": {"content": "..."}}]}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{SummarizerPort, SummaryError};

const MAX_TOKENS: u32 = 1000;

/// chat completions 请求体
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// HTTP 摘要客户端配置
#[derive(Debug, Clone)]
pub struct HttpSummarizerConfig {
    /// API 基础 URL（不含 /chat/completions）
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpSummarizerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            api_key: String::new(),
            model: "gemma2-9b-it".to_string(),
            timeout_secs: 60,
        }
    }
}

impl HttpSummarizerConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP 摘要客户端
pub struct HttpSummarizer {
    client: Client,
    config: HttpSummarizerConfig,
}

impl HttpSummarizer {
    pub fn new(config: HttpSummarizerConfig) -> Result<Self, SummaryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SummaryError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

fn build_prompt(content: &str) -> String {
    format!(
        "Please provide a concise summary of the following chapter text in 5-10 sentences:\n\n{}\n\nSummary:",
        content
    )
}

/// 取第一个选项的消息内容（已裁剪）
fn extract_summary(response: ChatResponse) -> Result<String, SummaryError> {
    let summary = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| SummaryError::InvalidResponse("response has no choices".to_string()))?;

    if summary.is_empty() {
        return Err(SummaryError::InvalidResponse("empty summary".to_string()));
    }

    Ok(summary)
}

#[async_trait]
impl SummarizerPort for HttpSummarizer {
    async fn summarize(&self, content: &str) -> Result<String, SummaryError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(content),
            }],
            temperature: 0.0,
            max_tokens: MAX_TOKENS,
        };

        tracing::debug!(
            url = %self.completions_url(),
            model = %self.config.model,
            content_chars = content.chars().count(),
            "Sending summary request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SummaryError::Timeout
                } else if e.is_connect() {
                    SummaryError::NetworkError(format!("Cannot connect to summary service: {}", e))
                } else {
                    SummaryError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SummaryError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| SummaryError::InvalidResponse(e.to_string()))?;

        extract_summary(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = HttpSummarizerConfig::new("http://localhost:9000/v1/", "key")
            .with_model("test-model")
            .with_timeout(5);
        assert_eq!(config.model, "test-model");
        assert_eq!(config.timeout_secs, 5);

        let client = HttpSummarizer::new(config).unwrap();
        assert_eq!(
            client.completions_url(),
            "http://localhost:9000/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: "m",
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt("Chapter text."),
            }],
            temperature: 0.0,
            max_tokens: MAX_TOKENS,
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["max_tokens"], 1000);
        assert_eq!(json["temperature"], 0.0);
        assert_eq!(json["messages"][0]["role"], "user");
        let prompt = json["messages"][0]["content"].as_str().unwrap();
        assert!(prompt.contains("5-10 sentences"));
        assert!(prompt.contains("Chapter text."));
    }

    #[test]
    fn test_extract_summary() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  It was short.\n"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_summary(body).unwrap(), "It was short.");

        let empty: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            extract_summary(empty),
            Err(SummaryError::InvalidResponse(_))
        ));
    }
}
