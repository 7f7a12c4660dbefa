//! Identifying fields of a simulation request

use serde::{Deserialize, Serialize};

use crate::{errors::DomainError, value_objects::CacheKey};

/// The fields that determine a simulation's identity
///
/// Display names (topic, chapter, subject) are deliberately absent: two
/// requests with the same identity share one cache entry whatever they are
/// called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimulationIdentity {
    pub topic_id: Option<i64>,
    pub chapter_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub level: i64,
}

impl SimulationIdentity {
    /// Create a new identity
    pub const fn new(
        topic_id: Option<i64>,
        chapter_id: Option<i64>,
        subject_id: Option<i64>,
        level: i64,
    ) -> Self {
        Self {
            topic_id,
            chapter_id,
            subject_id,
            level,
        }
    }

    /// Delimited string the cache key is hashed from
    ///
    /// Fields appear in fixed order; absent ids render as `none`.
    pub fn key_material(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            render_id(self.topic_id),
            render_id(self.chapter_id),
            render_id(self.subject_id),
            self.level
        )
    }

    /// Derive the cache key for this identity
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::derive(self)
    }
}

fn render_id(id: Option<i64>) -> String {
    id.map_or_else(|| "none".to_string(), |v| v.to_string())
}

/// Coerce a textual identifier to an integer
///
/// Surrounding whitespace is ignored.
///
/// # Errors
/// Returns `InvalidIdentifier` naming `field` when the text is not an integer.
pub fn parse_identifier(field: &str, raw: &str) -> Result<i64, DomainError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| DomainError::invalid_identifier(field, raw))
}
