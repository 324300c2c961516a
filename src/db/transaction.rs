use async_trait::async_trait;
use sqlx::SqliteConnection;

use crate::core::BulkError;

/// A unit of work run by [`crate::db::Database::in_transaction`].
///
/// The connection is already inside a transaction. Returning `Ok` commits it,
/// returning `Err` rolls it back.
#[async_trait]
pub trait TransactionCallback: Send {
    type Output: Send;

    async fn in_transaction(self, conn: &mut SqliteConnection) -> Result<Self::Output, BulkError>;
}

/// `select count(*) from customer`
pub struct CountCustomers;

#[async_trait]
impl TransactionCallback for CountCustomers {
    type Output = i64;

    async fn in_transaction(self, conn: &mut SqliteConnection) -> Result<i64, BulkError> {
        let count: i64 = sqlx::query_scalar("select count(*) from customer")
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }
}

/// `delete from customer`
pub struct ClearCustomers;

#[async_trait]
impl TransactionCallback for ClearCustomers {
    type Output = u64;

    async fn in_transaction(self, conn: &mut SqliteConnection) -> Result<u64, BulkError> {
        let result = sqlx::query("delete from customer")
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }
}
