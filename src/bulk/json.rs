use async_trait::async_trait;
use sqlx::SqliteConnection;

use crate::bulk::{BulkOperations, check_batch_size};
use crate::core::BulkError;
use crate::db::{Database, TransactionCallback};
use crate::model::Customer;

/// Binds each chunk as one JSON array of ids, expanded by SQLite's `json_each`.
pub struct JsonEachInsert {
    db: Database,
    batch_size: usize,
}

impl JsonEachInsert {
    pub fn new(db: Database, batch_size: usize) -> Self {
        Self { db, batch_size }
    }
}

struct InsertJson<'a> {
    entities: &'a [Customer],
    batch_size: usize,
}

#[async_trait]
impl TransactionCallback for InsertJson<'_> {
    type Output = ();

    async fn in_transaction(self, conn: &mut SqliteConnection) -> Result<(), BulkError> {
        for chunk in self.entities.chunks(self.batch_size) {
            let ids: Vec<i64> = chunk.iter().map(|c| c.id).collect();
            let payload = serde_json::to_string(&ids)?;
            sqlx::query("insert into customer (id) select value from json_each(?)")
                .bind(payload)
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl BulkOperations for JsonEachInsert {
    fn name(&self) -> &'static str {
        "json_each"
    }

    async fn bulk_persist(&self, entities: &[Customer]) -> Result<(), BulkError> {
        if entities.is_empty() {
            return Ok(());
        }
        check_batch_size(self.batch_size)?;
        self.db
            .in_transaction(InsertJson {
                entities,
                batch_size: self.batch_size,
            })
            .await
    }
}
