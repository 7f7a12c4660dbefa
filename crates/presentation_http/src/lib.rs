//! Simulation cache HTTP presentation layer
//!
//! Axum routes, handlers, and error mapping for the simulation cache API.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use error::{ApiError, set_expose_internal_errors};
pub use middleware::{RequestIdLayer, ValidatedJson, ValidatedQuery, ValidationError};
pub use routes::create_router;
pub use state::AppState;
