//! Cached simulation entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{CacheKey, SimulationIdentity};

/// Tag stored for every generated simulation
pub const DEFAULT_SIMULATION_TYPE: &str = "auto";

/// A validated simulation request: display names plus identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationDescriptor {
    pub topic: String,
    pub chapter: String,
    pub subject: String,
    pub identity: SimulationIdentity,
}

impl SimulationDescriptor {
    /// Create a new descriptor
    pub fn new(
        topic: impl Into<String>,
        chapter: impl Into<String>,
        subject: impl Into<String>,
        identity: SimulationIdentity,
    ) -> Self {
        Self {
            topic: topic.into(),
            chapter: chapter.into(),
            subject: subject.into(),
            identity,
        }
    }

    /// Cache key of the simulation this descriptor asks for
    pub fn cache_key(&self) -> CacheKey {
        self.identity.cache_key()
    }

    /// Grade or level of the simulation
    pub const fn level(&self) -> i64 {
        self.identity.level
    }
}

/// Metadata for a simulation that is about to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSimulation {
    pub cache_key: CacheKey,
    pub descriptor: SimulationDescriptor,
    pub simulation_type: String,
    pub file_path: String,
    pub created_at: DateTime<Utc>,
}

impl NewSimulation {
    /// Build the metadata row for freshly generated content
    pub fn generated(descriptor: SimulationDescriptor, file_path: impl Into<String>) -> Self {
        Self {
            cache_key: descriptor.cache_key(),
            descriptor,
            simulation_type: DEFAULT_SIMULATION_TYPE.to_string(),
            file_path: file_path.into(),
            created_at: Utc::now(),
        }
    }
}

/// One row of cache metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationEntry {
    pub id: i64,
    pub cache_key: CacheKey,
    pub topic: String,
    pub topic_id: Option<i64>,
    pub chapter: String,
    pub chapter_id: Option<i64>,
    pub subject: String,
    pub subject_id: Option<i64>,
    pub level: i64,
    pub simulation_type: String,
    pub file_path: String,
    pub created_at: DateTime<Utc>,
    pub accessed_at: DateTime<Utc>,
    pub access_count: i64,
}

impl SimulationEntry {
    /// Identity fields of this entry
    pub const fn identity(&self) -> SimulationIdentity {
        SimulationIdentity::new(self.topic_id, self.chapter_id, self.subject_id, self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> SimulationDescriptor {
        SimulationDescriptor::new(
            "Gravity",
            "Mechanics",
            "Physics",
            SimulationIdentity::new(Some(5), Some(2), Some(1), 10),
        )
    }

    #[test]
    fn descriptor_key_ignores_display_names() {
        let renamed = SimulationDescriptor::new(
            "Gravitation",
            "Classical Mechanics",
            "Natural Science",
            SimulationIdentity::new(Some(5), Some(2), Some(1), 10),
        );
        assert_eq!(descriptor().cache_key(), renamed.cache_key());
    }

    #[test]
    fn generated_simulation_uses_default_type() {
        let new = NewSimulation::generated(descriptor(), "html_cache/x.html");
        assert_eq!(new.simulation_type, DEFAULT_SIMULATION_TYPE);
        assert_eq!(new.cache_key, descriptor().cache_key());
        assert_eq!(new.file_path, "html_cache/x.html");
    }

    #[test]
    fn entry_identity_round_trips() {
        let now = Utc::now();
        let entry = SimulationEntry {
            id: 1,
            cache_key: descriptor().cache_key(),
            topic: "Gravity".to_string(),
            topic_id: Some(5),
            chapter: "Mechanics".to_string(),
            chapter_id: Some(2),
            subject: "Physics".to_string(),
            subject_id: Some(1),
            level: 10,
            simulation_type: DEFAULT_SIMULATION_TYPE.to_string(),
            file_path: "html_cache/x.html".to_string(),
            created_at: now,
            accessed_at: now,
            access_count: 0,
        };
        assert_eq!(entry.identity(), descriptor().identity);
        assert_eq!(entry.identity().cache_key(), entry.cache_key);
    }
}
