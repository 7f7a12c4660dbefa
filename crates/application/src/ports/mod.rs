//! Port definitions (interfaces for external systems)
//!
//! Ports define how the application layer interacts with storage and the
//! generation backend. Adapters in the infrastructure layer implement them.

pub mod content_store;
pub mod inference_port;
pub mod simulation_store;

pub use content_store::ContentStorePort;
pub use inference_port::{InferencePort, InferenceResult};
pub use simulation_store::{PageRequest, SimulationFilter, SimulationStorePort};
