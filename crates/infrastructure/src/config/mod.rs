//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server and logging settings
//! - `database`: SQLite database settings
//! - `content`: generated document storage
//!
//! Sources are layered: serde defaults, then an optional `config.toml`, then
//! `SIMULATOR__SECTION__KEY` environment variables.

mod content;
mod database;
mod server;

use ai_core::InferenceConfig;
use application::error::ApplicationError;
use config::{Config, ConfigBuilder, ConfigError, builder::DefaultState};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

pub use content::ContentConfig;
pub use database::DatabaseConfig;
pub use server::{LogFormat, ServerConfig};

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "SIMULATOR";

/// Plain environment variable that also supplies the Gemini API key
pub const LEGACY_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Application environment (development or production)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment - internal error details are exposed
    #[default]
    Development,
    /// Production environment - internal error details are hidden
    Production,
}

impl Environment {
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Generation backend configuration
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Generated content storage
    #[serde(default)]
    pub content: ContentConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(env_source());

        Self::from_builder(builder, std::env::var(LEGACY_API_KEY_VAR).ok())
    }

    /// Build the configuration and fill the API key from the legacy variable
    fn from_builder(
        builder: ConfigBuilder<DefaultState>,
        legacy_api_key: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config: Self = builder.build()?.try_deserialize()?;
        config.apply_legacy_api_key(legacy_api_key);
        Ok(config)
    }

    fn apply_legacy_api_key(&mut self, legacy_api_key: Option<String>) {
        if has_secret(self.inference.api_key.as_ref()) {
            return;
        }
        if let Some(key) = legacy_api_key.filter(|k| !k.trim().is_empty()) {
            debug!(variable = LEGACY_API_KEY_VAR, "Using API key from legacy variable");
            self.inference.api_key = Some(SecretString::from(key));
        }
    }

    /// Fail unless a non-empty API key is configured
    pub fn require_api_key(&self) -> Result<(), ApplicationError> {
        if has_secret(self.inference.api_key.as_ref()) {
            Ok(())
        } else {
            Err(ApplicationError::Configuration(format!(
                "Gemini API key is required: set {LEGACY_API_KEY_VAR} or \
                 {ENV_PREFIX}__INFERENCE__API_KEY"
            )))
        }
    }

    /// Whether error responses may include internal details
    pub const fn expose_internal_errors(&self) -> bool {
        !self.environment.is_production()
    }
}

fn has_secret(secret: Option<&SecretString>) -> bool {
    secret.is_some_and(|s| !s.expose_secret().trim().is_empty())
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("server.allowed_origins")
}
