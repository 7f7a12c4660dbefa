//! Port definitions for inference engine
//!
//! Defines the trait that inference clients must implement.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::InferenceError;

/// Single-prompt generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceRequest {
    /// User prompt
    pub prompt: String,
    /// Model to use (overrides config default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Temperature for sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl InferenceRequest {
    /// Create a request with only a prompt
    pub fn simple(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: None,
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// Set the model for this request
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set temperature
    #[must_use]
    pub const fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }
}

/// Response from inference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceResponse {
    /// Generated content
    pub content: String,
    /// Model that generated the response
    pub model: String,
    /// Token usage statistics
    pub usage: Option<TokenUsage>,
    /// Finish reason reported by the API
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Port for inference engine implementations
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Generate a complete response
    async fn generate(&self, request: InferenceRequest)
    -> Result<InferenceResponse, InferenceError>;

    /// Check if the generation API is reachable with the configured model
    async fn health_check(&self) -> Result<bool, InferenceError>;

    /// Get the configured model
    fn default_model(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inference_request_simple() {
        let req = InferenceRequest::simple("Hello");
        assert_eq!(req.prompt, "Hello");
        assert!(req.model.is_none());
        assert!(req.temperature.is_none());
    }

    #[test]
    fn inference_request_builders() {
        let req = InferenceRequest::simple("Test")
            .with_model("my-model")
            .with_temperature(0.2);
        assert_eq!(req.model.as_deref(), Some("my-model"));
        assert_eq!(req.temperature, Some(0.2));
    }

    #[test]
    fn unset_options_are_not_serialized() {
        let json = serde_json::to_string(&InferenceRequest::simple("x")).unwrap();
        assert_eq!(json, r#"{"prompt":"x"}"#);
    }
}
