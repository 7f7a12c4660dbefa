//! Curriculum view: simulations of one subject and level

use axum::{
    Json,
    extract::{Path, State},
};
use domain::parse_identifier;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    handlers::views::{SimulationView, views},
    state::AppState,
};

/// Simulations of one subject and level
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CurriculumResponse {
    pub subject_id: i64,
    pub level: i64,
    pub count: usize,
    /// Ordered by chapter id, then topic id
    pub simulations: Vec<SimulationView>,
}

/// List a subject's simulations for one level in curriculum order
#[utoipa::path(
    get,
    path = "/subjects/{subject_id}/levels/{level}/simulations",
    tag = "simulations",
    params(
        ("subject_id" = i64, Path, description = "Subject identifier"),
        ("level" = i64, Path, description = "Grade level")
    ),
    responses(
        (status = 200, description = "Simulations in curriculum order", body = CurriculumResponse),
        (status = 422, description = "Non-numeric identifier", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn curriculum(
    State(state): State<AppState>,
    Path((subject_id, level)): Path<(String, String)>,
) -> Result<Json<CurriculumResponse>, ApiError> {
    let subject_id = parse_identifier("subject_id", &subject_id)?;
    let level = parse_identifier("level", &level)?;

    let entries = state.simulations.curriculum(subject_id, level).await?;

    Ok(Json(CurriculumResponse {
        subject_id,
        level,
        count: entries.len(),
        simulations: views(entries),
    }))
}
