//! Aggregate cache statistics

use serde::{Deserialize, Serialize};

use crate::value_objects::CacheKey;

/// Number of entries reported in `most_accessed`
pub const MOST_ACCESSED_LIMIT: usize = 5;

/// Aggregate view over all cache entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationStatistics {
    pub total_simulations: u64,
    pub unique_subjects: u64,
    pub unique_levels: u64,
    pub total_accesses: i64,
    /// `None` when the cache is empty
    pub avg_accesses_per_simulation: Option<f64>,
    pub most_accessed: Vec<MostAccessed>,
}

/// Summary of a frequently read entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MostAccessed {
    pub cache_key: CacheKey,
    pub topic: String,
    pub subject: String,
    pub level: i64,
    pub access_count: i64,
}

impl SimulationStatistics {
    /// Whether the cache holds no entries
    pub const fn is_empty(&self) -> bool {
        self.total_simulations == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        let stats = SimulationStatistics::default();
        assert!(stats.is_empty());
        assert!(stats.avg_accesses_per_simulation.is_none());
        assert!(stats.most_accessed.is_empty());
    }

    #[test]
    fn empty_average_serializes_as_null() {
        let json = serde_json::to_value(SimulationStatistics::default()).unwrap();
        assert!(json["avg_accesses_per_simulation"].is_null());
        assert_eq!(json["total_simulations"], 0);
    }
}
