//! SQLite simulation metadata store
//!
//! Implements `SimulationStorePort` on top of the pooled connection.

use std::sync::Arc;

use application::{
    error::ApplicationError,
    ports::{PageRequest, SimulationFilter, SimulationStorePort},
};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use domain::{
    CacheKey, MOST_ACCESSED_LIMIT, MostAccessed, NewSimulation, SearchField, SimulationEntry,
    SimulationStatistics,
};
use rusqlite::{OptionalExtension, Row, params, params_from_iter, types::Value};
use tokio::task;
use tracing::{debug, instrument, warn};

use super::{
    connection::ConnectionPool,
    error::{map_join_error, map_pool_error, map_sqlite_error},
};

const ENTRY_COLUMNS: &str = "id, cache_key, topic, topic_id, chapter, chapter_id, subject, \
                             subject_id, level, simulation_type, file_path, created_at, \
                             accessed_at, access_count";

/// SQLite-based simulation metadata store
#[derive(Debug, Clone)]
pub struct SqliteSimulationStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteSimulationStore {
    /// Create a new SQLite simulation store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Run a blocking closure against a pooled connection
    async fn with_conn<T, F>(&self, f: F) -> Result<T, ApplicationError>
    where
        T: Send + 'static,
        F: FnOnce(&rusqlite::Connection) -> Result<T, ApplicationError> + Send + 'static,
    {
        let pool = Arc::clone(&self.pool);
        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_pool_error)?;
            f(&conn)
        })
        .await
        .map_err(map_join_error)?
    }
}

/// Timestamps are stored as fixed-width RFC 3339 so they sort as text
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_cache_key(idx: usize, raw: &str) -> rusqlite::Result<CacheKey> {
    CacheKey::parse(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Convert a database row (in `ENTRY_COLUMNS` order) to an entry
fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<SimulationEntry> {
    let cache_key: String = row.get(1)?;
    let created_at: String = row.get(11)?;
    let accessed_at: String = row.get(12)?;

    Ok(SimulationEntry {
        id: row.get(0)?,
        cache_key: parse_cache_key(1, &cache_key)?,
        topic: row.get(2)?,
        topic_id: row.get(3)?,
        chapter: row.get(4)?,
        chapter_id: row.get(5)?,
        subject: row.get(6)?,
        subject_id: row.get(7)?,
        level: row.get(8)?,
        simulation_type: row.get(9)?,
        file_path: row.get(10)?,
        created_at: parse_timestamp(11, &created_at)?,
        accessed_at: parse_timestamp(12, &accessed_at)?,
        access_count: row.get(13)?,
    })
}

/// WHERE clause and parameters for an equality filter
fn filter_clause(filter: SimulationFilter) -> (String, Vec<Value>) {
    let mut conditions = Vec::new();
    let mut values = Vec::new();

    if let Some(level) = filter.level {
        values.push(Value::Integer(level));
        conditions.push(format!("level = ?{}", values.len()));
    }
    if let Some(subject_id) = filter.subject_id {
        values.push(Value::Integer(subject_id));
        conditions.push(format!("subject_id = ?{}", values.len()));
    }

    if conditions.is_empty() {
        (String::new(), values)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), values)
    }
}

/// Collect mapped rows, propagating the first conversion error
fn collect_entries(
    rows: impl Iterator<Item = rusqlite::Result<SimulationEntry>>,
) -> Result<Vec<SimulationEntry>, ApplicationError> {
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(map_sqlite_error)
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

#[async_trait]
impl SimulationStorePort for SqliteSimulationStore {
    #[instrument(skip(self, simulation), fields(cache_key = %simulation.cache_key))]
    async fn insert(&self, simulation: &NewSimulation) -> Result<i64, ApplicationError> {
        let simulation = simulation.clone();

        self.with_conn(move |conn| {
            let created_at = format_timestamp(simulation.created_at);
            let identity = simulation.descriptor.identity;

            conn.execute(
                "INSERT INTO simulations
                    (cache_key, topic, topic_id, chapter, chapter_id, subject, subject_id,
                     level, simulation_type, file_path, created_at, accessed_at, access_count)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11, 0)",
                params![
                    simulation.cache_key.as_str(),
                    simulation.descriptor.topic,
                    identity.topic_id,
                    simulation.descriptor.chapter,
                    identity.chapter_id,
                    simulation.descriptor.subject,
                    identity.subject_id,
                    identity.level,
                    simulation.simulation_type,
                    simulation.file_path,
                    created_at,
                ],
            )
            .map_err(|e| match map_sqlite_error(e) {
                ApplicationError::Conflict(_) => ApplicationError::Conflict(format!(
                    "simulation {} already exists",
                    simulation.cache_key
                )),
                other => other,
            })?;

            let id = conn.last_insert_rowid();
            debug!(id, "Inserted simulation");
            Ok(id)
        })
        .await
    }

    #[instrument(skip(self), fields(cache_key = %key))]
    async fn get_by_key(&self, key: &CacheKey) -> Result<Option<SimulationEntry>, ApplicationError> {
        let key = key.clone();
        let now = format_timestamp(Utc::now());

        self.with_conn(move |conn| {
            let sql = format!(
                "UPDATE simulations
                 SET access_count = access_count + 1, accessed_at = ?2
                 WHERE cache_key = ?1
                 RETURNING {ENTRY_COLUMNS}"
            );
            conn.query_row(&sql, params![key.as_str(), now], row_to_entry)
                .optional()
                .map_err(map_sqlite_error)
        })
        .await
    }

    #[instrument(skip(self), fields(cache_key = %key))]
    async fn contains(&self, key: &CacheKey) -> Result<bool, ApplicationError> {
        let key = key.clone();

        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM simulations WHERE cache_key = ?1)",
                [key.as_str()],
                |row| row.get(0),
            )
            .map_err(map_sqlite_error)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        filter: SimulationFilter,
        page: PageRequest,
    ) -> Result<Vec<SimulationEntry>, ApplicationError> {
        self.with_conn(move |conn| {
            let (where_clause, mut values) = filter_clause(filter);
            // SQLite treats a negative LIMIT as unbounded
            values.push(Value::Integer(page.limit.map_or(-1, i64::from)));
            values.push(Value::Integer(i64::from(page.offset)));
            let sql = format!(
                "SELECT {ENTRY_COLUMNS} FROM simulations{where_clause}
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?{} OFFSET ?{}",
                values.len() - 1,
                values.len()
            );

            let mut stmt = conn.prepare(&sql).map_err(map_sqlite_error)?;
            let rows = stmt
                .query_map(params_from_iter(values), row_to_entry)
                .map_err(map_sqlite_error)?;
            let entries = collect_entries(rows)?;

            debug!(count = entries.len(), "Listed simulations");
            Ok(entries)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: SimulationFilter) -> Result<u64, ApplicationError> {
        self.with_conn(move |conn| {
            let (where_clause, values) = filter_clause(filter);
            let sql = format!("SELECT COUNT(*) FROM simulations{where_clause}");
            let count: i64 = conn
                .query_row(&sql, params_from_iter(values), |row| row.get(0))
                .map_err(map_sqlite_error)?;
            Ok(to_count(count))
        })
        .await
    }

    #[instrument(skip(self, fields), fields(field_count = fields.len()))]
    async fn search(
        &self,
        term: &str,
        fields: &[SearchField],
    ) -> Result<Vec<SimulationEntry>, ApplicationError> {
        let term = term.to_string();
        let fields = if fields.is_empty() {
            SearchField::ALL.to_vec()
        } else {
            fields.to_vec()
        };

        self.with_conn(move |conn| {
            // instr() is a case-sensitive substring test, unlike LIKE
            let conditions = fields
                .iter()
                .map(|field| format!("instr({}, ?1) > 0", field.column()))
                .collect::<Vec<_>>()
                .join(" OR ");
            let sql = format!(
                "SELECT {ENTRY_COLUMNS} FROM simulations
                 WHERE {conditions}
                 ORDER BY created_at DESC, id DESC"
            );

            let mut stmt = conn.prepare(&sql).map_err(map_sqlite_error)?;
            let rows = stmt
                .query_map([&term], row_to_entry)
                .map_err(map_sqlite_error)?;
            let entries = collect_entries(rows)?;

            debug!(count = entries.len(), "Searched simulations");
            Ok(entries)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn list_by_subject_and_level(
        &self,
        subject_id: i64,
        level: i64,
    ) -> Result<Vec<SimulationEntry>, ApplicationError> {
        self.with_conn(move |conn| {
            let sql = format!(
                "SELECT {ENTRY_COLUMNS} FROM simulations
                 WHERE subject_id = ?1 AND level = ?2
                 ORDER BY chapter_id, topic_id, id"
            );
            let mut stmt = conn.prepare(&sql).map_err(map_sqlite_error)?;
            let rows = stmt
                .query_map(params![subject_id, level], row_to_entry)
                .map_err(map_sqlite_error)?;
            collect_entries(rows)
        })
        .await
    }

    #[instrument(skip(self), fields(cache_key = %key))]
    async fn update_file_path(
        &self,
        key: &CacheKey,
        file_path: &str,
    ) -> Result<bool, ApplicationError> {
        let key = key.clone();
        let file_path = file_path.to_string();

        self.with_conn(move |conn| {
            let updated = conn
                .execute(
                    "UPDATE simulations SET file_path = ?1 WHERE cache_key = ?2",
                    params![file_path, key.as_str()],
                )
                .map_err(map_sqlite_error)?;

            debug!(updated = updated > 0, "Updated simulation file path");
            Ok(updated > 0)
        })
        .await
    }

    #[instrument(skip(self), fields(cache_key = %key))]
    async fn delete_by_key(&self, key: &CacheKey) -> Result<bool, ApplicationError> {
        let key = key.clone();

        self.with_conn(move |conn| {
            let deleted = conn
                .execute("DELETE FROM simulations WHERE cache_key = ?1", [key.as_str()])
                .map_err(map_sqlite_error)?;

            debug!(deleted = deleted > 0, "Deleted simulation");
            Ok(deleted > 0)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_all(&self) -> Result<u64, ApplicationError> {
        self.with_conn(|conn| {
            let deleted = conn
                .execute("DELETE FROM simulations", [])
                .map_err(map_sqlite_error)?;

            debug!(deleted, "Deleted all simulations");
            Ok(deleted as u64)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn statistics(&self) -> Result<SimulationStatistics, ApplicationError> {
        self.with_conn(|conn| {
            let (total, subjects, levels, accesses, average) = conn
                .query_row(
                    "SELECT COUNT(*), COUNT(DISTINCT subject_id), COUNT(DISTINCT level),
                            COALESCE(SUM(access_count), 0), AVG(access_count)
                     FROM simulations",
                    [],
                    |row| {
                        Ok((
                            row.get::<_, i64>(0)?,
                            row.get::<_, i64>(1)?,
                            row.get::<_, i64>(2)?,
                            row.get::<_, i64>(3)?,
                            row.get::<_, Option<f64>>(4)?,
                        ))
                    },
                )
                .map_err(map_sqlite_error)?;

            let most_accessed_limit = i64::try_from(MOST_ACCESSED_LIMIT).unwrap_or(i64::MAX);
            let mut stmt = conn
                .prepare(
                    "SELECT cache_key, topic, subject, level, access_count
                     FROM simulations
                     ORDER BY access_count DESC, id ASC
                     LIMIT ?1",
                )
                .map_err(map_sqlite_error)?;
            let most_accessed = stmt
                .query_map([most_accessed_limit], |row| {
                    let cache_key: String = row.get(0)?;
                    Ok(MostAccessed {
                        cache_key: parse_cache_key(0, &cache_key)?,
                        topic: row.get(1)?,
                        subject: row.get(2)?,
                        level: row.get(3)?,
                        access_count: row.get(4)?,
                    })
                })
                .map_err(map_sqlite_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sqlite_error)?;

            Ok(SimulationStatistics {
                total_simulations: to_count(total),
                unique_subjects: to_count(subjects),
                unique_levels: to_count(levels),
                total_accesses: accesses,
                avg_accesses_per_simulation: average,
                most_accessed,
            })
        })
        .await
    }

    async fn is_healthy(&self) -> bool {
        let result = self
            .with_conn(|conn| {
                conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                    .map_err(map_sqlite_error)
            })
            .await;

        match result {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Database health check failed");
                false
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use domain::{SimulationDescriptor, SimulationIdentity};

    use super::*;
    use crate::{config::DatabaseConfig, persistence::connection::create_pool};

    fn create_test_store() -> SqliteSimulationStore {
        let config = DatabaseConfig {
            path: ":memory:".to_string(),
            max_connections: 1,
            run_migrations: true,
        };
        let pool = create_pool(&config).unwrap();
        SqliteSimulationStore::new(Arc::new(pool))
    }

    fn descriptor(topic: &str, chapter: &str, subject: &str, ids: (i64, i64, i64), level: i64) -> SimulationDescriptor {
        SimulationDescriptor::new(
            topic,
            chapter,
            subject,
            SimulationIdentity::new(Some(ids.0), Some(ids.1), Some(ids.2), level),
        )
    }

    fn new_simulation(descriptor: SimulationDescriptor, age_secs: i64) -> NewSimulation {
        let mut simulation =
            NewSimulation::generated(descriptor.clone(), format!("html_cache/{}.html", descriptor.cache_key()));
        simulation.created_at = Utc::now() - TimeDelta::seconds(age_secs);
        simulation
    }

    async fn seed(store: &SqliteSimulationStore) -> Vec<CacheKey> {
        let rows = [
            (descriptor("Gravity", "Forces", "Physics", (5, 2, 1), 10), 30),
            (descriptor("Friction", "Forces", "Physics", (6, 2, 1), 10), 20),
            (descriptor("Cells", "Living things", "Biology", (1, 1, 3), 8), 10),
            (descriptor("Atoms", "Matter", "Chemistry", (2, 4, 2), 10), 0),
        ];
        let mut keys = Vec::new();
        for (descriptor, age) in rows {
            keys.push(descriptor.cache_key());
            store.insert(&new_simulation(descriptor, age)).await.unwrap();
        }
        keys
    }

    #[tokio::test]
    async fn insert_and_get() {
        let store = create_test_store();
        let gravity = descriptor("Gravity", "Forces", "Physics", (5, 2, 1), 10);
        let key = gravity.cache_key();

        let id = store.insert(&new_simulation(gravity, 0)).await.unwrap();
        let entry = store.get_by_key(&key).await.unwrap().unwrap();

        assert_eq!(entry.id, id);
        assert_eq!(entry.cache_key, key);
        assert_eq!(entry.topic, "Gravity");
        assert_eq!(entry.topic_id, Some(5));
        assert_eq!(entry.subject_id, Some(1));
        assert_eq!(entry.level, 10);
        assert_eq!(entry.simulation_type, "auto");
        assert!(entry.file_path.ends_with(&format!("{key}.html")));
    }

    #[tokio::test]
    async fn get_by_key_increments_access_count() {
        let store = create_test_store();
        let gravity = descriptor("Gravity", "Forces", "Physics", (5, 2, 1), 10);
        let key = gravity.cache_key();
        store.insert(&new_simulation(gravity, 60)).await.unwrap();

        let first = store.get_by_key(&key).await.unwrap().unwrap();
        let second = store.get_by_key(&key).await.unwrap().unwrap();

        assert_eq!(first.access_count, 1);
        assert_eq!(second.access_count, 2);
        assert!(second.accessed_at >= first.accessed_at);
        assert!(second.accessed_at > second.created_at);
        assert_eq!(first.created_at, second.created_at);
    }

    #[tokio::test]
    async fn get_missing_key_returns_none() {
        let store = create_test_store();
        let key = descriptor("x", "y", "z", (1, 1, 1), 1).cache_key();

        assert!(store.get_by_key(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_duplicate_is_conflict() {
        let store = create_test_store();
        let gravity = descriptor("Gravity", "Forces", "Physics", (5, 2, 1), 10);
        store.insert(&new_simulation(gravity.clone(), 0)).await.unwrap();

        let err = store.insert(&new_simulation(gravity, 0)).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Conflict(_)));
    }

    #[tokio::test]
    async fn contains_does_not_touch_statistics() {
        let store = create_test_store();
        let gravity = descriptor("Gravity", "Forces", "Physics", (5, 2, 1), 10);
        let key = gravity.cache_key();
        store.insert(&new_simulation(gravity, 0)).await.unwrap();

        assert!(store.contains(&key).await.unwrap());
        assert!(store.contains(&key).await.unwrap());

        let stats = store.statistics().await.unwrap();
        assert_eq!(stats.total_accesses, 0);
    }

    #[tokio::test]
    async fn list_orders_newest_first() {
        let store = create_test_store();
        let keys = seed(&store).await;

        let entries = store
            .list(SimulationFilter::any(), PageRequest::all())
            .await
            .unwrap();

        let listed: Vec<_> = entries.iter().map(|e| e.cache_key.clone()).collect();
        let mut expected = keys;
        expected.reverse();
        assert_eq!(listed, expected);
    }

    #[tokio::test]
    async fn list_applies_filter_and_page() {
        let store = create_test_store();
        seed(&store).await;

        let level_ten = SimulationFilter::any().with_level(10);
        let page = store
            .list(level_ten, PageRequest::new(Some(2), 1))
            .await
            .unwrap();
        let topics: Vec<_> = page.iter().map(|e| e.topic.as_str()).collect();
        assert_eq!(topics, vec!["Friction", "Gravity"]);

        assert_eq!(store.count(level_ten).await.unwrap(), 3);
        assert_eq!(
            store
                .count(level_ten.with_subject_id(1))
                .await
                .unwrap(),
            2
        );
        assert_eq!(store.count(SimulationFilter::any()).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn list_offset_past_end_is_empty() {
        let store = create_test_store();
        seed(&store).await;

        let entries = store
            .list(SimulationFilter::any(), PageRequest::new(Some(10), 50))
            .await
            .unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn search_is_case_sensitive_substring() {
        let store = create_test_store();
        seed(&store).await;

        let hits = store.search("Forc", &SearchField::ALL).await.unwrap();
        assert_eq!(hits.len(), 2);

        let none = store.search("forc", &SearchField::ALL).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn search_respects_fields() {
        let store = create_test_store();
        seed(&store).await;

        let restricted = store
            .search("Forces", &[SearchField::Topic, SearchField::Subject])
            .await
            .unwrap();
        assert!(restricted.is_empty());

        let chapter = store
            .search("Forces", &[SearchField::Chapter])
            .await
            .unwrap();
        assert_eq!(chapter.len(), 2);
        assert_eq!(chapter[0].topic, "Friction");
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let store = create_test_store();
        seed(&store).await;

        assert!(store.search("%", &SearchField::ALL).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_by_subject_and_level_orders_by_chapter_then_topic() {
        let store = create_test_store();
        store
            .insert(&new_simulation(descriptor("B", "Two", "Physics", (2, 2, 1), 10), 0))
            .await
            .unwrap();
        store
            .insert(&new_simulation(descriptor("A", "One", "Physics", (9, 1, 1), 10), 0))
            .await
            .unwrap();
        store
            .insert(&new_simulation(descriptor("C", "Two", "Physics", (1, 2, 1), 10), 0))
            .await
            .unwrap();
        store
            .insert(&new_simulation(descriptor("D", "One", "Physics", (1, 1, 1), 9), 0))
            .await
            .unwrap();

        let entries = store.list_by_subject_and_level(1, 10).await.unwrap();
        let topics: Vec<_> = entries.iter().map(|e| e.topic.as_str()).collect();
        assert_eq!(topics, vec!["A", "C", "B"]);
    }

    #[tokio::test]
    async fn update_file_path_rewrites_only_the_location() {
        let store = create_test_store();
        let keys = seed(&store).await;
        let before = store.get_by_key(&keys[0]).await.unwrap().unwrap();

        assert!(store.update_file_path(&keys[0], "new_dir/x.html").await.unwrap());

        let after = store.get_by_key(&keys[0]).await.unwrap().unwrap();
        assert_eq!(after.file_path, "new_dir/x.html");
        assert_eq!(after.topic, before.topic);
        assert_eq!(after.created_at, before.created_at);
    }

    #[tokio::test]
    async fn update_file_path_of_unknown_key() {
        let store = create_test_store();
        let key = descriptor("Nope", "None", "Nothing", (9, 9, 9), 1).cache_key();

        assert!(!store.update_file_path(&key, "x.html").await.unwrap());
        assert_eq!(store.count(SimulationFilter::any()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_by_key() {
        let store = create_test_store();
        let keys = seed(&store).await;

        assert!(store.delete_by_key(&keys[0]).await.unwrap());
        assert!(!store.delete_by_key(&keys[0]).await.unwrap());
        assert!(!store.contains(&keys[0]).await.unwrap());
        assert_eq!(store.count(SimulationFilter::any()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn delete_all_returns_count() {
        let store = create_test_store();
        seed(&store).await;

        assert_eq!(store.delete_all().await.unwrap(), 4);
        assert_eq!(store.count(SimulationFilter::any()).await.unwrap(), 0);
        assert_eq!(store.delete_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn statistics_on_empty_store() {
        let store = create_test_store();

        let stats = store.statistics().await.unwrap();
        assert_eq!(stats, SimulationStatistics::default());
    }

    #[tokio::test]
    async fn statistics_aggregate_and_rank() {
        let store = create_test_store();
        let keys = seed(&store).await;
        for _ in 0..3 {
            store.get_by_key(&keys[2]).await.unwrap();
        }
        store.get_by_key(&keys[0]).await.unwrap();

        let stats = store.statistics().await.unwrap();
        assert_eq!(stats.total_simulations, 4);
        assert_eq!(stats.unique_subjects, 3);
        assert_eq!(stats.unique_levels, 2);
        assert_eq!(stats.total_accesses, 4);
        assert_eq!(stats.avg_accesses_per_simulation, Some(1.0));
        assert_eq!(stats.most_accessed.len(), 4);
        assert_eq!(stats.most_accessed[0].topic, "Cells");
        assert_eq!(stats.most_accessed[0].access_count, 3);
        assert_eq!(stats.most_accessed[1].cache_key, keys[0]);
    }

    #[tokio::test]
    async fn statistics_limit_most_accessed() {
        let store = create_test_store();
        for i in 0..7 {
            let d = descriptor(&format!("T{i}"), "C", "S", (i, 1, 1), 1);
            store.insert(&new_simulation(d, 0)).await.unwrap();
        }

        let stats = store.statistics().await.unwrap();
        assert_eq!(stats.most_accessed.len(), MOST_ACCESSED_LIMIT);
    }

    #[tokio::test]
    async fn absent_identifiers_round_trip() {
        let store = create_test_store();
        let d = SimulationDescriptor::new("Free", "Play", "Misc", SimulationIdentity::new(None, None, None, 3));
        let key = d.cache_key();
        store.insert(&new_simulation(d, 0)).await.unwrap();

        let entry = store.get_by_key(&key).await.unwrap().unwrap();
        assert_eq!(entry.topic_id, None);
        assert_eq!(entry.subject_id, None);

        let stats = store.statistics().await.unwrap();
        assert_eq!(stats.unique_subjects, 0);
    }

    #[tokio::test]
    async fn health_check_succeeds() {
        let store = create_test_store();
        assert!(store.is_healthy().await);
    }
}
