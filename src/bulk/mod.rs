//! Bulk persist strategies for the `customer` table.

mod json;
mod single;
mod values;

use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::BulkError;
use crate::db::Database;
use crate::model::Customer;

pub use json::JsonEachInsert;
pub use single::SingleInsert;
pub use values::{ChunkedInsert, MultiValuesInsert};

/// Writes many customers in one logical batch.
///
/// Implementations either insert every entity or return an error. The caller
/// verifies the result with a row count.
#[async_trait]
pub trait BulkOperations: Send + Sync {
    /// Human-readable name for reports.
    fn name(&self) -> &'static str;

    /// Persists all `entities`. An empty slice is a no-op.
    async fn bulk_persist(&self, entities: &[Customer]) -> Result<(), BulkError>;
}

/// Chunking strategies cannot split a slice into empty chunks.
fn check_batch_size(batch_size: usize) -> Result<(), BulkError> {
    if batch_size == 0 {
        return Err(BulkError::InvalidArgument(
            "batch_size must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// One insert statement per entity, single transaction.
    Single,
    /// Multi-row insert statements, single transaction.
    MultiValues,
    /// Multi-row insert statements, one transaction per chunk.
    Chunked,
    /// One JSON array parameter per chunk expanded with `json_each`.
    JsonEach,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Single,
        StrategyKind::MultiValues,
        StrategyKind::Chunked,
        StrategyKind::JsonEach,
    ];

    pub fn build(self, db: Database, batch_size: usize) -> Box<dyn BulkOperations> {
        match self {
            StrategyKind::Single => Box::new(SingleInsert::new(db)),
            StrategyKind::MultiValues => Box::new(MultiValuesInsert::new(db, batch_size)),
            StrategyKind::Chunked => Box::new(ChunkedInsert::new(db, batch_size)),
            StrategyKind::JsonEach => Box::new(JsonEachInsert::new(db, batch_size)),
        }
    }
}
