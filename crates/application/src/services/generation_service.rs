//! Generation service - Prompt rendering and response clean-up
//!
//! Turns a simulation descriptor into a single generation call and strips the
//! Markdown code fence models like to wrap their HTML in.

use std::{fmt, sync::Arc};

use domain::SimulationDescriptor;
use tracing::{debug, info, instrument, warn};

use crate::{error::ApplicationError, ports::InferencePort};

const CODE_FENCE: &str = "```";

/// Render the generation prompt for a descriptor
pub fn render_prompt(descriptor: &SimulationDescriptor) -> String {
    format!(
        "Create a complete, self-contained, interactive HTML page for an educational simulation \
         with the following requirements:\n\
         \n\
         Subject: {subject}\n\
         Chapter: {chapter}\n\
         Topic: {topic}\n\
         Grade/Level: {level}\n\
         \n\
         Requirements:\n\
         1. Create a 3D interactive simulation using Three.js if required, otherwise a 2D \
         interactive simulation using Canvas or SVG.\n\
         2. The simulation should be highly educational and help students understand the \
         concept through interaction.\n\
         3. Include clear on-screen instructions explaining how to interact with the simulation.\n\
         4. Add controls (sliders, buttons, inputs) to modify parameters and observe changes.\n\
         5. Include educational explanations and labels.\n\
         6. Make it visually appealing with good UI/UX.\n\
         7. The HTML must be complete and ready to run (include all necessary CDN links).\n\
         8. Add responsive design for mobile and desktop.\n\
         9. Include interactive elements that demonstrate the core concepts.\n\
         10. Add reset and play/pause controls where applicable.\n\
         \n\
         Important:\n\
         - Use only CDN links for external libraries (Three.js for 3D, no npm packages).\n\
         - Make it production-ready and bug-free.\n\
         - Focus on educational value and interactivity.\n\
         - Include color-coded visual elements to aid understanding.\n\
         - Add tooltips or info boxes explaining what is happening.\n\
         \n\
         Return ONLY the complete HTML code, nothing else. No markdown, no explanations, just \
         the HTML.",
        subject = descriptor.subject,
        chapter = descriptor.chapter,
        topic = descriptor.topic,
        level = descriptor.level(),
    )
}

/// Remove a surrounding Markdown code fence from generated output
///
/// Trims, drops a leading fence with its optional language tag, drops a
/// trailing fence, and trims again. Unfenced text is only trimmed.
pub fn strip_code_fence(raw: &str) -> String {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix(CODE_FENCE) {
        let tag_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+')))
            .unwrap_or(rest.len());
        text = &rest[tag_len..];
    }

    if let Some(rest) = text.strip_suffix(CODE_FENCE) {
        text = rest;
    }

    text.trim().to_string()
}

/// Produces simulation documents through the inference port
#[derive(Clone)]
pub struct SimulationGenerator {
    inference: Arc<dyn InferencePort>,
}

impl fmt::Debug for SimulationGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationGenerator").finish_non_exhaustive()
    }
}

impl SimulationGenerator {
    /// Create a new generator
    pub fn new(inference: Arc<dyn InferencePort>) -> Self {
        Self { inference }
    }

    /// Name of the model used for generation
    pub fn model(&self) -> String {
        self.inference.current_model()
    }

    /// Check if the generation backend is reachable
    pub async fn is_healthy(&self) -> bool {
        self.inference.is_healthy().await
    }

    /// Generate the HTML document for a descriptor
    ///
    /// One call, no retry. Any backend failure becomes
    /// `ApplicationError::Generation` carrying the backend's message.
    #[instrument(skip(self, descriptor), fields(topic = %descriptor.topic, level = descriptor.level()))]
    pub async fn generate(&self, descriptor: &SimulationDescriptor) -> Result<String, ApplicationError> {
        let prompt = render_prompt(descriptor);
        debug!(prompt_len = prompt.len(), "Rendered generation prompt");

        let result = self
            .inference
            .generate(&prompt)
            .await
            .map_err(into_generation_error)?;

        let html = strip_code_fence(&result.content);
        if html.is_empty() {
            warn!(model = %result.model, "Generation returned no content");
            return Err(ApplicationError::Generation(
                "generation service returned empty content".to_string(),
            ));
        }

        info!(
            model = %result.model,
            tokens = ?result.tokens_used,
            latency_ms = result.latency_ms,
            content_len = html.len(),
            "Simulation generated"
        );

        Ok(html)
    }
}

fn into_generation_error(err: ApplicationError) -> ApplicationError {
    match err {
        ApplicationError::Generation(message) => ApplicationError::Generation(message),
        other => ApplicationError::Generation(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use domain::SimulationIdentity;
    use mockall::mock;

    use super::*;
    use crate::ports::InferenceResult;

    mock! {
        pub InferenceEngine {}

        #[async_trait::async_trait]
        impl InferencePort for InferenceEngine {
            async fn generate(&self, prompt: &str) -> Result<InferenceResult, ApplicationError>;
            async fn is_healthy(&self) -> bool;
            fn current_model(&self) -> String;
        }
    }

    fn gravity() -> SimulationDescriptor {
        SimulationDescriptor::new(
            "Gravity",
            "Forces",
            "Physics",
            SimulationIdentity::new(Some(5), Some(2), Some(1), 10),
        )
    }

    fn result(content: &str) -> InferenceResult {
        InferenceResult {
            content: content.to_string(),
            model: "test-model".to_string(),
            tokens_used: Some(42),
            latency_ms: 100,
        }
    }

    #[test]
    fn prompt_mentions_descriptor() {
        let prompt = render_prompt(&gravity());
        assert!(prompt.contains("Subject: Physics"));
        assert!(prompt.contains("Chapter: Forces"));
        assert!(prompt.contains("Topic: Gravity"));
        assert!(prompt.contains("Grade/Level: 10"));
        assert!(prompt.contains("Return ONLY the complete HTML code"));
    }

    #[test]
    fn prompt_allows_cdn_libraries_and_playback_controls() {
        let prompt = render_prompt(&gravity());
        assert!(prompt.contains("using Three.js if required"));
        assert!(prompt.contains("Canvas or SVG"));
        assert!(prompt.contains("include all necessary CDN links"));
        assert!(prompt.contains("Add reset and play/pause controls"));
        assert!(prompt.contains("tooltips or info boxes"));
        assert!(prompt.contains("color-coded visual elements"));
        assert!(prompt.contains("on-screen instructions"));
        assert!(!prompt.contains("Do not load external libraries"));
    }

    #[test]
    fn strips_html_fence() {
        assert_eq!(
            strip_code_fence("```html\n<html></html>\n```"),
            "<html></html>"
        );
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(strip_code_fence("```\n<p>x</p>\n```"), "<p>x</p>");
    }

    #[test]
    fn strips_surrounding_whitespace() {
        assert_eq!(
            strip_code_fence("  \n```html\n<html></html>```\n\n"),
            "<html></html>"
        );
    }

    #[test]
    fn leaves_unfenced_content() {
        assert_eq!(strip_code_fence("  <html></html>  "), "<html></html>");
    }

    #[test]
    fn handles_missing_closing_fence() {
        assert_eq!(strip_code_fence("```html\n<html></html>"), "<html></html>");
    }

    #[test]
    fn keeps_inner_fences() {
        let raw = "```html\n<pre>```js```</pre>\n```";
        assert_eq!(strip_code_fence(raw), "<pre>```js```</pre>");
    }

    #[tokio::test]
    async fn generate_returns_stripped_content() {
        let mut mock = MockInferenceEngine::new();
        mock.expect_generate()
            .withf(|prompt| prompt.contains("Topic: Gravity"))
            .times(1)
            .returning(|_| Ok(result("```html\n<html>g</html>\n```")));

        let generator = SimulationGenerator::new(Arc::new(mock));
        let html = generator.generate(&gravity()).await.unwrap();

        assert_eq!(html, "<html>g</html>");
    }

    #[tokio::test]
    async fn generate_passes_backend_message_through() {
        let mut mock = MockInferenceEngine::new();
        mock.expect_generate()
            .returning(|_| Err(ApplicationError::Generation("quota exceeded".to_string())));

        let generator = SimulationGenerator::new(Arc::new(mock));
        let err = generator.generate(&gravity()).await.unwrap_err();

        assert!(matches!(err, ApplicationError::Generation(ref m) if m == "quota exceeded"));
    }

    #[tokio::test]
    async fn generate_wraps_other_errors() {
        let mut mock = MockInferenceEngine::new();
        mock.expect_generate()
            .returning(|_| Err(ApplicationError::Internal("boom".to_string())));

        let generator = SimulationGenerator::new(Arc::new(mock));
        let err = generator.generate(&gravity()).await.unwrap_err();

        assert!(matches!(err, ApplicationError::Generation(ref m) if m.contains("boom")));
    }

    #[tokio::test]
    async fn generate_rejects_empty_output() {
        let mut mock = MockInferenceEngine::new();
        mock.expect_generate().returning(|_| Ok(result("```html\n```")));

        let generator = SimulationGenerator::new(Arc::new(mock));
        let err = generator.generate(&gravity()).await.unwrap_err();

        assert!(matches!(err, ApplicationError::Generation(_)));
    }

    #[tokio::test]
    async fn model_and_health_delegate() {
        let mut mock = MockInferenceEngine::new();
        mock.expect_current_model()
            .returning(|| "gemini-test".to_string());
        mock.expect_is_healthy().returning(|| true);

        let generator = SimulationGenerator::new(Arc::new(mock));
        assert_eq!(generator.model(), "gemini-test");
        assert!(generator.is_healthy().await);
    }
}
