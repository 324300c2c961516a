mod benchmark;
mod config;
mod database;

pub use benchmark::{BenchmarkConfig, MAX_BATCH_SIZE, MAX_ROUNDS};
pub use config::Config;
pub use database::{DatabaseConfig, JournalMode, SynchronousMode};
