//! Test and benchmark utilities.
//!
//! This module is only available when the `testutil` feature is enabled.

use tempfile::TempDir;

use crate::conf::{BenchmarkConfig, DatabaseConfig};
use crate::db::Database;

/// Opens a fresh on-disk database in a temp dir.
/// Returns the TempDir (must be kept alive) and the handle.
pub async fn setup_file_database() -> (TempDir, Database) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let config = DatabaseConfig::for_file(&dir.path().join("bench.db"));
    let db = Database::connect(&config)
        .await
        .expect("failed to open database");
    (dir, db)
}

/// Opens a fresh in-memory database.
pub async fn setup_memory_database() -> Database {
    Database::connect(&DatabaseConfig::default())
        .await
        .expect("failed to open database")
}

/// A short benchmark: `entities` rows, one warmup round, two measured rounds.
pub fn small_benchmark(entities: usize, batch_size: usize) -> BenchmarkConfig {
    BenchmarkConfig {
        entities,
        rounds: 2,
        warmup_rounds: 1,
        batch_size,
        ..BenchmarkConfig::default()
    }
}
