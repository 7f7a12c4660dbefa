//! Simulation generation handler

use application::GenerateOutcome;
use axum::{extract::State, http::StatusCode, response::Html};
use domain::{DomainError, SimulationDescriptor, SimulationIdentity, parse_identifier};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::{error::ApiError, middleware::ValidatedJson, state::AppState};

/// An identifier sent either as a JSON number or as numeric text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum IdInput {
    Int(i64),
    Str(String),
}

impl IdInput {
    fn resolve(&self, field: &str) -> Result<i64, DomainError> {
        match self {
            Self::Int(v) => Ok(*v),
            Self::Str(s) => parse_identifier(field, s),
        }
    }
}

fn resolve_optional(input: Option<&IdInput>, field: &str) -> Result<Option<i64>, DomainError> {
    input.map(|id| id.resolve(field)).transpose()
}

/// Request body for `POST /generate`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "topic": "Gravity",
    "topic_id": 5,
    "chapter": "Mechanics",
    "chapter_id": "2",
    "subject": "Physics",
    "subject_id": 1,
    "level": 10
}))]
pub struct GenerateRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub topic: String,
    #[serde(default)]
    pub topic_id: Option<IdInput>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub chapter: String,
    #[serde(default)]
    pub chapter_id: Option<IdInput>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub subject: String,
    #[serde(default)]
    pub subject_id: Option<IdInput>,
    pub level: IdInput,
}

impl GenerateRequest {
    /// Coerce the identifiers and build the domain descriptor
    pub fn into_descriptor(self) -> Result<SimulationDescriptor, DomainError> {
        let identity = SimulationIdentity::new(
            resolve_optional(self.topic_id.as_ref(), "topic_id")?,
            resolve_optional(self.chapter_id.as_ref(), "chapter_id")?,
            resolve_optional(self.subject_id.as_ref(), "subject_id")?,
            self.level.resolve("level")?,
        );
        Ok(SimulationDescriptor::new(
            self.topic,
            self.chapter,
            self.subject,
            identity,
        ))
    }
}

/// Return the cached simulation or generate a new one
#[utoipa::path(
    post,
    path = "/generate",
    tag = "simulations",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Cached simulation", body = String, content_type = "text/html"),
        (status = 201, description = "Newly generated simulation", body = String, content_type = "text/html"),
        (status = 400, description = "Malformed JSON", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 500, description = "Generation or storage failed", body = crate::error::ErrorResponse),
        (status = 503, description = "Concurrent request is storing the same simulation", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(topic = %request.topic, subject = %request.subject))]
pub async fn generate(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<GenerateRequest>,
) -> Result<(StatusCode, Html<String>), ApiError> {
    let descriptor = request.into_descriptor()?;
    info!(level = descriptor.level(), "Generation request received");

    let outcome = state.simulations.generate(&descriptor).await?;
    let status = match outcome {
        GenerateOutcome::Cached { .. } => StatusCode::OK,
        GenerateOutcome::Generated { .. } => StatusCode::CREATED,
    };

    Ok((status, Html(outcome.into_content())))
}
