//! Model client seam — the text-generation capability behind analysis.
//!
//! Defines the client trait and error types for calling the hosted model.
//! Two implementations:
//! - `GeminiClient`: calls the Gemini generateContent REST API (production)
//! - `MockClient`: returns a scripted reply (testing)
//!
//! Transport errors propagate to the caller unchanged; the analyzer never
//! retries and applies no timeout of its own.

use async_trait::async_trait;

/// Errors from model client operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("model unavailable: {0}")]
    Unavailable(String),
    #[error("authentication rejected: {0}")]
    Auth(String),
    #[error("quota exhausted: {0}")]
    Quota(String),
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("model returned no text")]
    EmptyResponse,
}

/// Client trait for the text-generation service.
///
/// Abstracts over transport (HTTP, mock) so the analysis pipeline doesn't
/// depend on how the model is reached.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Model identifier recorded in result metadata.
    fn model_id(&self) -> &str;

    /// Generate raw response text for a prompt.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Mock client for testing — answers every call with the same reply.
pub struct MockClient {
    model: String,
    reply: Result<String, LlmError>,
}

impl MockClient {
    /// Mock that returns `text` for every generate call.
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            model: "mock-model".to_string(),
            reply: Ok(text.into()),
        }
    }

    /// Mock that fails every generate call with `error`.
    pub fn failing(error: LlmError) -> Self {
        Self {
            model: "mock-model".to_string(),
            reply: Err(error),
        }
    }

    /// Override the reported model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl LlmClient for MockClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        self.reply.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replying_mock_returns_text() {
        let client = MockClient::replying("scripted");
        assert_eq!(client.model_id(), "mock-model");
        assert_eq!(client.generate("prompt").await.unwrap(), "scripted");
    }

    #[tokio::test]
    async fn failing_mock_returns_error() {
        let client = MockClient::failing(LlmError::Quota("rate limit".to_string()));
        let err = client.generate("prompt").await.unwrap_err();
        assert!(matches!(err, LlmError::Quota(_)));
    }

    #[tokio::test]
    async fn mock_model_id_is_configurable() {
        let client = MockClient::replying("ok").with_model("gemini-2.0-flash-exp");
        assert_eq!(client.model_id(), "gemini-2.0-flash-exp");
    }
}
