//! Value Objects - Immutable, identity-less domain primitives

mod cache_key;
mod search_field;
mod simulation_identity;

pub use cache_key::CacheKey;
pub use search_field::SearchField;
pub use simulation_identity::{SimulationIdentity, parse_identifier};
