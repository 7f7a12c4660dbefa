//! Configuration for the inference engine

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Configuration for the inference engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Base URL of the generation API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model to generate with
    #[serde(default = "default_model")]
    pub model: String,

    /// API key sent with every request
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Request timeout in milliseconds; unset keeps the transport default
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Sampling temperature (0.0 - 2.0)
    #[serde(default)]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-3-pro-preview".to_string()
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            timeout_ms: None,
            temperature: None,
            max_output_tokens: None,
        }
    }
}

impl InferenceConfig {
    /// Default configuration with an API key
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::from(api_key.into())),
            ..Default::default()
        }
    }

    /// Whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}
