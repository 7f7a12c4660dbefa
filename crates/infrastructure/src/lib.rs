//! Infrastructure layer - Adapters for storage, generation, and configuration
//!
//! Implements the application ports with SQLite, the filesystem, and the
//! Gemini client, and owns configuration loading and logging setup.

pub mod adapters;
pub mod config;
pub mod content;
pub mod persistence;
pub mod telemetry;

pub use adapters::GeminiInferenceAdapter;
pub use config::{AppConfig, ContentConfig, DatabaseConfig, Environment, LogFormat, ServerConfig};
pub use content::FileContentStore;
pub use persistence::{ConnectionPool, DatabaseError, SqliteSimulationStore, create_pool};
pub use telemetry::{TelemetryError, init_logging};
