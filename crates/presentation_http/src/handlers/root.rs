//! Service index

use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Name reported by the index and the OpenAPI document
pub const SERVICE_NAME: &str = "HTML Simulator API";

/// One route of the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EndpointInfo {
    pub method: String,
    pub path: String,
    pub description: String,
}

/// Service name, version, and routes
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub endpoints: Vec<EndpointInfo>,
}

const ENDPOINTS: &[(&str, &str, &str)] = &[
    ("POST", "/generate", "Generate HTML simulation"),
    ("GET", "/simulations", "List cached simulations with pagination"),
    ("GET", "/simulations/search", "Search simulations"),
    ("GET", "/simulations/stats", "Get database statistics"),
    ("GET", "/simulations/{cache_key}", "Get specific simulation"),
    ("DELETE", "/simulations/{cache_key}", "Delete specific simulation"),
    ("DELETE", "/cache/clear", "Clear all cache"),
    (
        "GET",
        "/subjects/{subject_id}/levels/{level}/simulations",
        "List a subject's simulations for one level",
    ),
    ("GET", "/health", "Liveness check"),
    ("GET", "/ready", "Readiness check"),
    ("GET", "/openapi.json", "OpenAPI document"),
];

/// Describe the service
#[utoipa::path(
    get,
    path = "/",
    tag = "system",
    responses((status = 200, description = "Service index", body = ServiceInfo))
)]
pub async fn index() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: ENDPOINTS
            .iter()
            .map(|(method, path, description)| EndpointInfo {
                method: (*method).to_string(),
                path: (*path).to_string(),
                description: (*description).to_string(),
            })
            .collect(),
    })
}
