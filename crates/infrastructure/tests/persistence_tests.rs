//! Integration tests for the persistence layer using on-disk SQLite databases
//!
//! These tests exercise the pooled store with several connections, which the
//! in-memory unit tests cannot do.

#![allow(clippy::expect_used)]

use std::sync::Arc;

use application::{
    ApplicationError,
    ports::{ContentStorePort, PageRequest, SimulationFilter, SimulationStorePort},
};
use domain::{NewSimulation, SimulationDescriptor, SimulationIdentity};
use infrastructure::{
    ContentConfig, DatabaseConfig, FileContentStore, SqliteSimulationStore, create_pool,
};
use tempfile::TempDir;

// ============================================================================
// Test Helpers
// ============================================================================

fn database_config(dir: &TempDir) -> DatabaseConfig {
    DatabaseConfig {
        path: dir.path().join("simulations.db").to_string_lossy().into_owned(),
        max_connections: 4,
        run_migrations: true,
    }
}

fn open_store(config: &DatabaseConfig) -> SqliteSimulationStore {
    let pool = create_pool(config).expect("Failed to create pool");
    SqliteSimulationStore::new(Arc::new(pool))
}

fn gravity() -> SimulationDescriptor {
    SimulationDescriptor::new(
        "Gravity",
        "Forces",
        "Physics",
        SimulationIdentity::new(Some(5), Some(2), Some(1), 10),
    )
}

fn new_simulation(descriptor: &SimulationDescriptor) -> NewSimulation {
    NewSimulation::generated(
        descriptor.clone(),
        format!("html_cache/{}.html", descriptor.cache_key()),
    )
}

// ============================================================================
// Durability
// ============================================================================

#[tokio::test]
async fn entries_survive_reopening_the_database() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = database_config(&dir);
    let key = gravity().cache_key();

    {
        let store = open_store(&config);
        store
            .insert(&new_simulation(&gravity()))
            .await
            .expect("insert");
        store.get_by_key(&key).await.expect("get");
    }

    let reopened = open_store(&config);
    let entry = reopened
        .get_by_key(&key)
        .await
        .expect("get")
        .expect("entry should exist");

    assert_eq!(entry.topic, "Gravity");
    assert_eq!(entry.access_count, 2);
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_identical_inserts_yield_one_conflict() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = open_store(&database_config(&dir));
    let simulation = new_simulation(&gravity());

    let first = {
        let store = store.clone();
        let simulation = simulation.clone();
        tokio::spawn(async move { store.insert(&simulation).await })
    };
    let second = {
        let store = store.clone();
        let simulation = simulation.clone();
        tokio::spawn(async move { store.insert(&simulation).await })
    };

    let results = [
        first.await.expect("join"),
        second.await.expect("join"),
    ];

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(ApplicationError::Conflict(_))))
        .count();
    assert_eq!(successes, 1);
    assert_eq!(conflicts, 1);
    assert_eq!(
        store
            .count(SimulationFilter::any())
            .await
            .expect("count"),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reads_count_every_access() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = open_store(&database_config(&dir));
    let key = gravity().cache_key();
    store
        .insert(&new_simulation(&gravity()))
        .await
        .expect("insert");

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = store.clone();
            let key = key.clone();
            tokio::spawn(async move { store.get_by_key(&key).await })
        })
        .collect();
    for handle in handles {
        handle.await.expect("join").expect("get");
    }

    let stats = store.statistics().await.expect("stats");
    assert_eq!(stats.total_accesses, 16);
}

// ============================================================================
// Metadata and content together
// ============================================================================

#[tokio::test]
async fn clear_leaves_both_stores_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = open_store(&database_config(&dir));
    let content = FileContentStore::open(&ContentConfig {
        directory: dir.path().join("html_cache").to_string_lossy().into_owned(),
    })
    .await
    .expect("content store");

    let descriptor = gravity();
    let key = descriptor.cache_key();
    let location = content.write(&key, "<html></html>").await.expect("write");
    let mut simulation = new_simulation(&descriptor);
    simulation.file_path = location;
    store.insert(&simulation).await.expect("insert");

    for entry in store
        .list(SimulationFilter::any(), PageRequest::all())
        .await
        .expect("list")
    {
        assert!(content.delete(&entry.cache_key).await.expect("delete"));
    }
    assert_eq!(store.delete_all().await.expect("delete_all"), 1);

    assert!(content.read(&key).await.expect("read").is_none());
    assert!(
        store
            .statistics()
            .await
            .expect("stats")
            .is_empty()
    );
}
