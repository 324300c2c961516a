use async_trait::async_trait;
use log::debug;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::bulk::{BulkOperations, check_batch_size};
use crate::core::BulkError;
use crate::db::{Database, TransactionCallback};
use crate::model::Customer;

/// Inserts `entities` with one `insert ... values (?), (?), ...` per chunk.
struct InsertValues<'a> {
    entities: &'a [Customer],
    batch_size: usize,
}

#[async_trait]
impl TransactionCallback for InsertValues<'_> {
    type Output = ();

    async fn in_transaction(self, conn: &mut SqliteConnection) -> Result<(), BulkError> {
        for chunk in self.entities.chunks(self.batch_size) {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("insert into customer (id) ");
            builder.push_values(chunk, |mut row, customer| {
                row.push_bind(customer.id);
            });
            builder.build().execute(&mut *conn).await?;
        }
        Ok(())
    }
}

pub struct MultiValuesInsert {
    db: Database,
    batch_size: usize,
}

impl MultiValuesInsert {
    pub fn new(db: Database, batch_size: usize) -> Self {
        Self { db, batch_size }
    }
}

#[async_trait]
impl BulkOperations for MultiValuesInsert {
    fn name(&self) -> &'static str {
        "multi_values"
    }

    async fn bulk_persist(&self, entities: &[Customer]) -> Result<(), BulkError> {
        if entities.is_empty() {
            return Ok(());
        }
        check_batch_size(self.batch_size)?;
        self.db
            .in_transaction(InsertValues {
                entities,
                batch_size: self.batch_size,
            })
            .await
    }
}

/// Same statements as [`MultiValuesInsert`], committed chunk by chunk.
/// A failing chunk leaves earlier chunks committed.
pub struct ChunkedInsert {
    db: Database,
    batch_size: usize,
}

impl ChunkedInsert {
    pub fn new(db: Database, batch_size: usize) -> Self {
        Self { db, batch_size }
    }
}

#[async_trait]
impl BulkOperations for ChunkedInsert {
    fn name(&self) -> &'static str {
        "chunked"
    }

    async fn bulk_persist(&self, entities: &[Customer]) -> Result<(), BulkError> {
        if entities.is_empty() {
            return Ok(());
        }
        check_batch_size(self.batch_size)?;
        for (i, chunk) in entities.chunks(self.batch_size).enumerate() {
            self.db
                .in_transaction(InsertValues {
                    entities: chunk,
                    batch_size: self.batch_size,
                })
                .await?;
            debug!("chunk {} committed ({} rows)", i, chunk.len());
        }
        Ok(())
    }
}
