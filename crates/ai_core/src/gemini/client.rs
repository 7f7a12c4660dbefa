//! Gemini client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use tracing::{debug, info, instrument, warn};

use super::types::{ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse};
use crate::{
    config::InferenceConfig,
    error::InferenceError,
    ports::{InferenceEngine, InferenceRequest, InferenceResponse},
};

const API_KEY_HEADER: &str = "x-goog-api-key";
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Inference engine backed by the Gemini REST API
#[derive(Debug)]
pub struct GeminiInferenceEngine {
    client: Client,
    config: InferenceConfig,
}

impl GeminiInferenceEngine {
    /// Create a new Gemini inference engine
    ///
    /// Fails if no API key is configured.
    pub fn new(config: InferenceConfig) -> Result<Self, InferenceError> {
        if config.api_key.is_none() {
            return Err(InferenceError::MissingApiKey);
        }

        let mut builder = Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let client = builder
            .build()
            .map_err(|e| InferenceError::ConnectionFailed(e.to_string()))?;

        info!(
            base_url = %config.base_url,
            model = %config.model,
            "Initialized Gemini inference engine"
        );

        Ok(Self { client, config })
    }

    /// Build the resource URL for a model
    fn model_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    fn api_key(&self) -> Result<&str, InferenceError> {
        self.config
            .api_key
            .as_ref()
            .map(|key| key.expose_secret())
            .ok_or(InferenceError::MissingApiKey)
    }

    fn resolve_model<'a>(&'a self, request: &'a InferenceRequest) -> &'a str {
        request.model.as_deref().unwrap_or(&self.config.model)
    }
}

/// Map a non-2xx response to an error, preferring the API's own message
fn error_for_status(status: StatusCode, body: &str) -> InferenceError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(body)
        .ok()
        .map(|envelope| match envelope.error.status {
            Some(code) if !envelope.error.message.is_empty() => {
                format!("{code}: {}", envelope.error.message)
            },
            _ => envelope.error.message,
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string());

    match status {
        StatusCode::TOO_MANY_REQUESTS => InferenceError::RateLimited(message),
        StatusCode::NOT_FOUND => InferenceError::ModelNotAvailable(message),
        _ => InferenceError::ServerError(format!("Status {}: {message}", status.as_u16())),
    }
}

#[async_trait]
impl InferenceEngine for GeminiInferenceEngine {
    #[instrument(skip(self, request), fields(model = %self.resolve_model(&request)))]
    async fn generate(
        &self,
        request: InferenceRequest,
    ) -> Result<InferenceResponse, InferenceError> {
        let model = self.resolve_model(&request).to_string();
        let api_key = self.api_key()?;

        let body = GenerateContentRequest::user_prompt(
            request.prompt,
            request.temperature.or(self.config.temperature),
            request.max_output_tokens.or(self.config.max_output_tokens),
        );

        debug!("Sending generateContent request");

        let response = self
            .client
            .post(format!("{}:generateContent", self.model_url(&model)))
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Generation request failed");
            return Err(error_for_status(status, &body));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        if let Some(reason) = parsed.block_reason() {
            return Err(InferenceError::EmptyResponse(format!(
                "prompt blocked: {reason}"
            )));
        }

        let content = parsed
            .text()
            .ok_or_else(|| InferenceError::EmptyResponse("no candidates returned".to_string()))?;

        let finish_reason = parsed.finish_reason().map(str::to_string);
        if content.trim().is_empty() {
            return Err(InferenceError::EmptyResponse(format!(
                "no text in candidate (finish reason: {})",
                finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        let usage = parsed.usage();
        debug!(tokens = ?usage, finish_reason = ?finish_reason, "Generation completed");

        Ok(InferenceResponse {
            content,
            model: parsed.model_version.unwrap_or(model),
            usage,
            finish_reason,
        })
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, InferenceError> {
        let response = self
            .client
            .get(self.model_url(&self.config.model))
            .header(API_KEY_HEADER, self.api_key()?)
            .timeout(HEALTH_CHECK_TIMEOUT)
            .send()
            .await;

        match response {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(e) if e.is_timeout() || e.is_connect() => Ok(false),
            Err(e) => Err(InferenceError::RequestFailed(e.to_string())),
        }
    }

    fn default_model(&self) -> &str {
        &self.config.model
    }
}
