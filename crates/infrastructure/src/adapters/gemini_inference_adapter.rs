//! Gemini inference adapter - Implements `InferencePort` using ai_core

use std::time::Instant;

use ai_core::{GeminiInferenceEngine, InferenceConfig, InferenceEngine, InferenceRequest};
use application::{
    error::ApplicationError,
    ports::{InferencePort, InferenceResult},
};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

/// Adapter exposing an ai_core inference engine as the application's port
pub struct GeminiInferenceAdapter {
    engine: Box<dyn InferenceEngine>,
}

impl std::fmt::Debug for GeminiInferenceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiInferenceAdapter")
            .field("model", &self.engine.default_model())
            .finish()
    }
}

impl GeminiInferenceAdapter {
    /// Create a new adapter with the given configuration
    pub fn new(config: InferenceConfig) -> Result<Self, ApplicationError> {
        let engine = GeminiInferenceEngine::new(config).map_err(Self::map_error)?;
        Ok(Self::from_engine(engine))
    }

    /// Wrap an existing engine
    pub fn from_engine(engine: impl InferenceEngine + 'static) -> Self {
        Self {
            engine: Box::new(engine),
        }
    }

    /// Convert ai_core error to application error
    fn map_error(e: ai_core::InferenceError) -> ApplicationError {
        match e {
            ai_core::InferenceError::MissingApiKey => {
                ApplicationError::Configuration(e.to_string())
            },
            other => ApplicationError::Generation(other.to_string()),
        }
    }
}

#[async_trait]
impl InferencePort for GeminiInferenceAdapter {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len(), model = %self.engine.default_model()))]
    async fn generate(&self, prompt: &str) -> Result<InferenceResult, ApplicationError> {
        let start = Instant::now();

        let response = self
            .engine
            .generate(InferenceRequest::simple(prompt))
            .await
            .map_err(|e| {
                warn!(error = %e, "Gemini generation failed");
                Self::map_error(e)
            })?;

        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        debug!(
            latency_ms,
            tokens = ?response.usage.map(|u| u.total_tokens),
            finish_reason = ?response.finish_reason,
            "Gemini generation completed"
        );

        Ok(InferenceResult {
            content: response.content,
            model: response.model,
            tokens_used: response.usage.map(|u| u.total_tokens),
            latency_ms,
        })
    }

    async fn is_healthy(&self) -> bool {
        match self.engine.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                warn!(error = %e, "Gemini health check failed");
                false
            },
        }
    }

    fn current_model(&self) -> String {
        self.engine.default_model().to_string()
    }
}

#[cfg(test)]
mod tests {
    use ai_core::{InferenceError, InferenceResponse, TokenUsage};
    use mockall::mock;

    use super::*;

    mock! {
        pub Engine {}

        #[async_trait]
        impl InferenceEngine for Engine {
            async fn generate(&self, request: InferenceRequest) -> Result<InferenceResponse, InferenceError>;
            async fn health_check(&self) -> Result<bool, InferenceError>;
            fn default_model(&self) -> &str;
        }
    }

    fn engine_with_model() -> MockEngine {
        let mut engine = MockEngine::new();
        engine
            .expect_default_model()
            .return_const("gemini-test".to_string());
        engine
    }

    #[tokio::test]
    async fn generate_maps_response() {
        let mut engine = engine_with_model();
        engine
            .expect_generate()
            .withf(|request| request.prompt == "prompt" && request.model.is_none())
            .returning(|_| {
                Ok(InferenceResponse {
                    content: "<html></html>".to_string(),
                    model: "gemini-test-001".to_string(),
                    usage: Some(TokenUsage {
                        prompt_tokens: 3,
                        completion_tokens: 4,
                        total_tokens: 7,
                    }),
                    finish_reason: Some("STOP".to_string()),
                })
            });

        let adapter = GeminiInferenceAdapter::from_engine(engine);
        let result = adapter.generate("prompt").await.unwrap();

        assert_eq!(result.content, "<html></html>");
        assert_eq!(result.model, "gemini-test-001");
        assert_eq!(result.tokens_used, Some(7));
    }

    #[tokio::test]
    async fn generate_errors_become_generation_errors() {
        let mut engine = engine_with_model();
        engine
            .expect_generate()
            .returning(|_| Err(InferenceError::RateLimited("quota".to_string())));

        let adapter = GeminiInferenceAdapter::from_engine(engine);
        let err = adapter.generate("prompt").await.unwrap_err();

        assert!(
            matches!(err, ApplicationError::Generation(ref m) if m == "Rate limit exceeded: quota")
        );
    }

    #[tokio::test]
    async fn health_check_error_is_unhealthy() {
        let mut engine = engine_with_model();
        engine
            .expect_health_check()
            .returning(|| Err(InferenceError::RequestFailed("boom".to_string())));

        let adapter = GeminiInferenceAdapter::from_engine(engine);
        assert!(!adapter.is_healthy().await);
    }

    #[test]
    fn current_model_comes_from_engine() {
        let adapter = GeminiInferenceAdapter::from_engine(engine_with_model());
        assert_eq!(adapter.current_model(), "gemini-test");
    }

    #[test]
    fn new_without_api_key_is_configuration_error() {
        let err = GeminiInferenceAdapter::new(InferenceConfig::default()).unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }
}
