//! Route definitions

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::{handlers, middleware::RequestIdLayer, openapi, state::AppState};

/// Create the main router with all routes
///
/// Every response carries an `X-Request-Id` header. CORS and HTTP tracing
/// are layered on by the server binary.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root::index))
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Generation
        .route("/generate", post(handlers::generate::generate))
        // Cached simulations; fixed segments before the key capture
        .route("/simulations", get(handlers::simulations::list_simulations))
        .route(
            "/simulations/search",
            get(handlers::simulations::search_simulations),
        )
        .route("/simulations/stats", get(handlers::simulations::statistics))
        .route(
            "/simulations/{cache_key}",
            get(handlers::simulations::get_simulation)
                .delete(handlers::simulations::delete_simulation),
        )
        .route(
            "/subjects/{subject_id}/levels/{level}/simulations",
            get(handlers::subjects::curriculum),
        )
        // Administration
        .route("/cache/clear", delete(handlers::cache::clear_cache))
        .merge(openapi::create_openapi_routes())
        .layer(RequestIdLayer::new())
        .with_state(state)
}
