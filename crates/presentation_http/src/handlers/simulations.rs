//! Cache browsing and per-entry handlers

use application::{PageRequest, SimulationFilter};
use axum::{
    Json,
    extract::{Path, State},
    response::Html,
};
use domain::{CacheKey, SearchField};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    error::ApiError,
    handlers::views::{SimulationView, StatisticsView, views},
    middleware::ValidatedQuery,
    state::AppState,
};

/// Largest page `GET /simulations` returns
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query parameters for listing simulations
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page size, 1 to 100; all rows when omitted
    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    pub limit: Option<u32>,
    /// Rows to skip
    pub offset: Option<u32>,
    /// Only entries of this level
    pub level: Option<i64>,
    /// Only entries of this subject
    pub subject_id: Option<i64>,
}

/// A page of simulations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListResponse {
    /// Rows matching the filter
    pub total: u64,
    pub limit: Option<u32>,
    pub offset: u32,
    /// Rows in this page
    pub count: usize,
    pub simulations: Vec<SimulationView>,
}

/// Query parameters for searching simulations
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Substring to look for
    #[validate(length(min = 1, message = "must not be empty"))]
    pub q: String,
    /// Comma-separated subset of `topic,chapter,subject`
    pub fields: Option<String>,
}

/// Search results
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<SimulationView>,
}

/// Confirmation of a deletion
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Parse a path key; anything malformed cannot name a stored simulation
pub(crate) fn path_key(raw: &str) -> Result<CacheKey, ApiError> {
    CacheKey::parse(raw).map_err(|e| {
        debug!(error = %e, "Rejected cache key");
        ApiError::NotFound("Simulation not found".to_string())
    })
}

/// List cached simulations, newest first
#[utoipa::path(
    get,
    path = "/simulations",
    tag = "simulations",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of simulations", body = ListResponse),
        (status = 422, description = "Invalid query parameters", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_simulations(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let offset = query.offset.unwrap_or(0);
    let filter = SimulationFilter {
        level: query.level,
        subject_id: query.subject_id,
    };

    let page = state
        .simulations
        .list(filter, PageRequest::new(query.limit, offset))
        .await?;
    info!(total = page.total, count = page.entries.len(), "Listed simulations");

    Ok(Json(ListResponse {
        total: page.total,
        limit: query.limit,
        offset,
        count: page.entries.len(),
        simulations: views(page.entries),
    }))
}

/// Substring search over display names
#[utoipa::path(
    get,
    path = "/simulations/search",
    tag = "simulations",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching simulations", body = SearchResponse),
        (status = 422, description = "Missing query or unknown field", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn search_simulations(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let fields = match query.fields.as_deref() {
        Some(raw) => SearchField::parse_list(raw)?,
        None => SearchField::ALL.to_vec(),
    };

    let results = state.simulations.search(&query.q, &fields).await?;
    info!(count = results.len(), "Search completed");

    Ok(Json(SearchResponse {
        query: query.q,
        count: results.len(),
        results: views(results),
    }))
}

/// Aggregate statistics
#[utoipa::path(
    get,
    path = "/simulations/stats",
    tag = "simulations",
    responses(
        (status = 200, description = "Cache statistics", body = StatisticsView)
    )
)]
#[instrument(skip(state))]
pub async fn statistics(State(state): State<AppState>) -> Result<Json<StatisticsView>, ApiError> {
    let stats = state.simulations.statistics().await?;
    Ok(Json(stats.into()))
}

/// Serve one cached simulation
#[utoipa::path(
    get,
    path = "/simulations/{cache_key}",
    tag = "simulations",
    params(("cache_key" = String, Path, description = "32 character hex cache key")),
    responses(
        (status = 200, description = "Cached simulation", body = String, content_type = "text/html"),
        (status = 404, description = "Simulation not found", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_simulation(
    State(state): State<AppState>,
    Path(cache_key): Path<String>,
) -> Result<Html<String>, ApiError> {
    let key = path_key(&cache_key)?;
    let content = state.simulations.get_content(&key).await?;
    Ok(Html(content))
}

/// Delete one cached simulation
#[utoipa::path(
    delete,
    path = "/simulations/{cache_key}",
    tag = "simulations",
    params(("cache_key" = String, Path, description = "32 character hex cache key")),
    responses(
        (status = 200, description = "Simulation deleted", body = MessageResponse),
        (status = 404, description = "Simulation not found", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_simulation(
    State(state): State<AppState>,
    Path(cache_key): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let key = path_key(&cache_key)?;
    state.simulations.delete(&key).await?;

    Ok(Json(MessageResponse {
        message: format!("Simulation {key} deleted successfully"),
    }))
}
