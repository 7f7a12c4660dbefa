//! JSON views of cache entries and statistics

use chrono::{DateTime, Utc};
use domain::{MostAccessed, SimulationEntry, SimulationStatistics};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One cached simulation's metadata
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SimulationView {
    pub id: i64,
    pub cache_key: String,
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

impl From<SimulationEntry> for SimulationView {
    fn from(entry: SimulationEntry) -> Self {
        Self {
            id: entry.id,
            cache_key: entry.cache_key.into_inner(),
            topic: entry.topic,
            topic_id: entry.topic_id,
            chapter: entry.chapter,
            chapter_id: entry.chapter_id,
            subject: entry.subject,
            subject_id: entry.subject_id,
            level: entry.level,
            simulation_type: entry.simulation_type,
            file_path: entry.file_path,
            created_at: entry.created_at,
            accessed_at: entry.accessed_at,
            access_count: entry.access_count,
        }
    }
}

pub(crate) fn views(entries: Vec<SimulationEntry>) -> Vec<SimulationView> {
    entries.into_iter().map(SimulationView::from).collect()
}

/// A frequently served simulation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MostAccessedView {
    pub cache_key: String,
    pub topic: String,
    pub subject: String,
    pub level: i64,
    pub access_count: i64,
}

impl From<MostAccessed> for MostAccessedView {
    fn from(entry: MostAccessed) -> Self {
        Self {
            cache_key: entry.cache_key.into_inner(),
            topic: entry.topic,
            subject: entry.subject,
            level: entry.level,
            access_count: entry.access_count,
        }
    }
}

/// Aggregate cache statistics
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatisticsView {
    pub total_simulations: u64,
    pub unique_subjects: u64,
    pub unique_levels: u64,
    pub total_accesses: i64,
    /// Null when the cache is empty
    pub avg_accesses_per_simulation: Option<f64>,
    pub most_accessed: Vec<MostAccessedView>,
}

impl From<SimulationStatistics> for StatisticsView {
    fn from(stats: SimulationStatistics) -> Self {
        Self {
            total_simulations: stats.total_simulations,
            unique_subjects: stats.unique_subjects,
            unique_levels: stats.unique_levels,
            total_accesses: stats.total_accesses,
            avg_accesses_per_simulation: stats.avg_accesses_per_simulation,
            most_accessed: stats
                .most_accessed
                .into_iter()
                .map(MostAccessedView::from)
                .collect(),
        }
    }
}
