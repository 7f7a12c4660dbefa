//! Persistence module
//!
//! SQLite-based storage for simulation metadata.

pub mod connection;
pub mod error;
pub mod migrations;
pub mod simulation_store;

pub use connection::{ConnectionPool, DatabaseError, create_pool};
pub use simulation_store::SqliteSimulationStore;
