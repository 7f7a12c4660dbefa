//! OpenAPI documentation module
//!
//! Serves the OpenAPI 3 document for the simulation cache API.

// Allow clippy warnings from macro-generated code in utoipa derive
#![allow(clippy::needless_for_each)]

use axum::{Json, Router, routing::get};
use utoipa::OpenApi;

use crate::{handlers, state::AppState};

/// Path the document is served from
pub const OPENAPI_PATH: &str = "/openapi.json";

/// OpenAPI documentation for the simulation cache
#[derive(OpenApi)]
#[openapi(
    info(
        title = "HTML Simulator API",
        description = "Generates interactive HTML simulations for lessons and caches them by topic, chapter, subject, and level",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "simulations", description = "Generation, lookup, and search of cached simulations"),
        (name = "cache", description = "Cache administration"),
        (name = "system", description = "Service index, health, and readiness")
    ),
    paths(
        handlers::root::index,
        handlers::health::health_check,
        handlers::health::readiness_check,
        handlers::generate::generate,
        handlers::simulations::list_simulations,
        handlers::simulations::search_simulations,
        handlers::simulations::statistics,
        handlers::simulations::get_simulation,
        handlers::simulations::delete_simulation,
        handlers::subjects::curriculum,
        handlers::cache::clear_cache,
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            handlers::root::ServiceInfo,
            handlers::root::EndpointInfo,
            handlers::health::HealthResponse,
            handlers::health::ReadinessResponse,
            handlers::health::ServiceStatus,
            handlers::generate::GenerateRequest,
            handlers::generate::IdInput,
            handlers::simulations::ListResponse,
            handlers::simulations::SearchResponse,
            handlers::simulations::MessageResponse,
            handlers::subjects::CurriculumResponse,
            handlers::cache::ClearResponse,
            handlers::views::SimulationView,
            handlers::views::StatisticsView,
            handlers::views::MostAccessedView,
        )
    )
)]
#[derive(Debug)]
pub struct ApiDoc;

/// Route serving the OpenAPI document as JSON
pub fn create_openapi_routes() -> Router<AppState> {
    let doc = ApiDoc::openapi();
    Router::new().route(OPENAPI_PATH, get(move || async move { Json(doc) }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_spec_lists_routes() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&doc).unwrap();
        assert!(json.contains("HTML Simulator API"));
        assert!(json.contains("/generate"));
        assert!(json.contains("/simulations/{cache_key}"));
        assert!(json.contains("/cache/clear"));
    }

    #[test]
    fn openapi_has_all_tags() {
        let doc = ApiDoc::openapi();
        let tags: Vec<&str> = doc
            .tags
            .as_ref()
            .map(|t| t.iter().map(|tag| tag.name.as_str()).collect())
            .unwrap_or_default();

        assert_eq!(tags, ["simulations", "cache", "system"]);
    }

    #[test]
    fn openapi_has_error_schema() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.schemas.contains_key("ErrorResponse"));
        assert!(components.schemas.contains_key("GenerateRequest"));
    }
}
