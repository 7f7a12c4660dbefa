//! Cache administration handler

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::{error::ApiError, state::AppState};

/// Result of clearing the cache
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClearResponse {
    pub message: String,
    /// Metadata rows removed
    pub deleted_count: u64,
    /// Content files removed
    pub deleted_files: u64,
}

/// Remove every cached simulation
#[utoipa::path(
    delete,
    path = "/cache/clear",
    tag = "cache",
    responses(
        (status = 200, description = "Cache cleared", body = ClearResponse),
        (status = 500, description = "Metadata could not be cleared", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn clear_cache(State(state): State<AppState>) -> Result<Json<ClearResponse>, ApiError> {
    let report = state.simulations.clear().await?;
    info!(
        deleted_count = report.deleted_records,
        deleted_files = report.deleted_files,
        "Cache cleared"
    );

    Ok(Json(ClearResponse {
        message: "Cache cleared successfully".to_string(),
        deleted_count: report.deleted_records,
        deleted_files: report.deleted_files,
    }))
}
