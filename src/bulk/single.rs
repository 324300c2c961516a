use async_trait::async_trait;
use sqlx::SqliteConnection;

use crate::bulk::BulkOperations;
use crate::core::BulkError;
use crate::db::{Database, TransactionCallback};
use crate::model::Customer;

pub struct SingleInsert {
    db: Database,
}

impl SingleInsert {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

struct InsertEach<'a> {
    entities: &'a [Customer],
}

#[async_trait]
impl TransactionCallback for InsertEach<'_> {
    type Output = ();

    async fn in_transaction(self, conn: &mut SqliteConnection) -> Result<(), BulkError> {
        for customer in self.entities {
            sqlx::query("insert into customer (id) values (?)")
                .bind(customer.id)
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl BulkOperations for SingleInsert {
    fn name(&self) -> &'static str {
        "single"
    }

    async fn bulk_persist(&self, entities: &[Customer]) -> Result<(), BulkError> {
        if entities.is_empty() {
            return Ok(());
        }
        self.db.in_transaction(InsertEach { entities }).await
    }
}
