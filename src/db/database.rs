use std::str::FromStr;

use log::{debug, info, warn};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};

use crate::conf::{DatabaseConfig, JournalMode, SynchronousMode};
use crate::core::BulkError;
use crate::db::{ClearCustomers, CountCustomers, TransactionCallback};
use crate::model::Customer;

pub const CUSTOMER_DDL: &str =
    "create table if not exists customer (id integer not null primary key)";

impl From<JournalMode> for SqliteJournalMode {
    fn from(mode: JournalMode) -> Self {
        match mode {
            JournalMode::Delete => SqliteJournalMode::Delete,
            JournalMode::Truncate => SqliteJournalMode::Truncate,
            JournalMode::Persist => SqliteJournalMode::Persist,
            JournalMode::Memory => SqliteJournalMode::Memory,
            JournalMode::Wal => SqliteJournalMode::Wal,
            JournalMode::Off => SqliteJournalMode::Off,
        }
    }
}

impl From<SynchronousMode> for SqliteSynchronous {
    fn from(mode: SynchronousMode) -> Self {
        match mode {
            SynchronousMode::Off => SqliteSynchronous::Off,
            SynchronousMode::Normal => SqliteSynchronous::Normal,
            SynchronousMode::Full => SqliteSynchronous::Full,
            SynchronousMode::Extra => SqliteSynchronous::Extra,
        }
    }
}

/// Handle to the benchmark database. Cloning shares the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, BulkError> {
        config.validate()?;

        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .journal_mode(config.journal_mode.into())
            .synchronous(config.synchronous.into());

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout);
        if config.is_in_memory() {
            // the database lives only as long as its single connection
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options.connect_with(options).await?;
        sqlx::query(CUSTOMER_DDL).execute(&pool).await?;

        info!(
            "Connected to {} (max_connections={}, journal_mode={:?}, synchronous={:?})",
            config.url, config.max_connections, config.journal_mode, config.synchronous
        );
        Ok(Self { pool })
    }

    /// Runs `callback` inside a transaction: commit on `Ok`, rollback on `Err`.
    pub async fn in_transaction<C>(&self, callback: C) -> Result<C::Output, BulkError>
    where
        C: TransactionCallback,
    {
        let mut tx = self.pool.begin().await?;
        match callback.in_transaction(&mut *tx).await {
            Ok(output) => {
                tx.commit().await?;
                Ok(output)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Rollback failed after '{}': {}", err, rollback_err);
                }
                Err(err)
            }
        }
    }

    pub async fn count(&self) -> Result<i64, BulkError> {
        self.in_transaction(CountCustomers).await
    }

    pub async fn clear(&self) -> Result<(), BulkError> {
        let deleted = self.in_transaction(ClearCustomers).await?;
        debug!("Cleared {} customers", deleted);
        Ok(())
    }

    /// All stored customers ordered by id.
    pub async fn customers(&self) -> Result<Vec<Customer>, BulkError> {
        let rows = sqlx::query_as::<_, Customer>("select id from customer order by id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sqlx::SqliteConnection;
    use tempfile::TempDir;

    struct InsertThenFail(i64);

    #[async_trait]
    impl TransactionCallback for InsertThenFail {
        type Output = ();

        async fn in_transaction(self, conn: &mut SqliteConnection) -> Result<(), BulkError> {
            sqlx::query("insert into customer (id) values (?)")
                .bind(self.0)
                .execute(&mut *conn)
                .await?;
            Err(BulkError::InvalidArgument("forced failure".to_string()))
        }
    }

    struct Insert(i64);

    #[async_trait]
    impl TransactionCallback for Insert {
        type Output = ();

        async fn in_transaction(self, conn: &mut SqliteConnection) -> Result<(), BulkError> {
            sqlx::query("insert into customer (id) values (?)")
                .bind(self.0)
                .execute(&mut *conn)
                .await?;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_connect_creates_empty_table() {
        let db = Database::connect(&DatabaseConfig::default()).await.unwrap();
        assert_eq!(db.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_commit_on_ok() {
        let db = Database::connect(&DatabaseConfig::default()).await.unwrap();
        db.in_transaction(Insert(1)).await.unwrap();
        db.in_transaction(Insert(2)).await.unwrap();
        assert_eq!(db.count().await.unwrap(), 2);
        assert_eq!(
            db.customers().await.unwrap(),
            vec![Customer::new(1), Customer::new(2)]
        );
    }

    #[tokio::test]
    async fn test_rollback_on_err() {
        let db = Database::connect(&DatabaseConfig::default()).await.unwrap();
        let err = db.in_transaction(InsertThenFail(1)).await;
        assert_eq!(
            err,
            Err(BulkError::InvalidArgument("forced failure".to_string()))
        );
        assert_eq!(db.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_clear_removes_rows() {
        let db = Database::connect(&DatabaseConfig::default()).await.unwrap();
        for id in 1..=3 {
            db.in_transaction(Insert(id)).await.unwrap();
        }
        db.clear().await.unwrap();
        assert_eq!(db.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_file_database_persists_across_connections() {
        let dir = TempDir::new().unwrap();
        let config = DatabaseConfig::for_file(&dir.path().join("bench.db"));

        {
            let db = Database::connect(&config).await.unwrap();
            db.in_transaction(Insert(7)).await.unwrap();
            db.close().await;
        }

        let db = Database::connect(&config).await.unwrap();
        assert_eq!(db.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_config() {
        let config = DatabaseConfig {
            max_connections: 2,
            ..DatabaseConfig::default()
        };
        assert!(Database::connect(&config).await.is_err());
    }
}
