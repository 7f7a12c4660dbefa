//! Application layer - Use cases and orchestration
//!
//! Defines the storage and inference ports and the services that drive the
//! cache: look up, generate on miss, persist, and administer entries.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
