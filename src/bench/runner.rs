use std::time::Instant;

use chrono::Utc;
use log::info;

use crate::bench::{BenchmarkReport, RoundResult};
use crate::bulk::BulkOperations;
use crate::conf::BenchmarkConfig;
use crate::core::BulkError;
use crate::db::Database;
use crate::model::{create_entities, shuffle_entities};

/// Runs create, persist, count and cleanup rounds for one strategy.
pub struct BenchmarkRunner {
    db: Database,
    operations: Box<dyn BulkOperations>,
    config: BenchmarkConfig,
}

impl BenchmarkRunner {
    pub fn new(db: Database, operations: Box<dyn BulkOperations>, config: BenchmarkConfig) -> Self {
        Self {
            db,
            operations,
            config,
        }
    }

    pub fn strategy(&self) -> &'static str {
        self.operations.name()
    }

    /// One round. The table is cleared afterwards even if the round failed;
    /// the round's own error takes precedence over a cleanup error.
    pub async fn run_round(&self, round: u32, warmup: bool) -> Result<RoundResult, BulkError> {
        let outcome = self.persist_and_verify(round, warmup).await;
        let cleared = self.db.clear().await;
        let result = outcome?;
        cleared?;
        Ok(result)
    }

    async fn persist_and_verify(&self, round: u32, warmup: bool) -> Result<RoundResult, BulkError> {
        let n = self.config.entities;
        let expected = i64::try_from(n)
            .map_err(|_| BulkError::InvalidArgument(format!("too many entities: {}", n)))?;

        let mut entities = create_entities(n);
        if self.config.shuffle {
            shuffle_entities(&mut entities, self.config.seed);
        }

        let start = Instant::now();
        self.operations.bulk_persist(&entities).await?;
        let elapsed = start.elapsed();

        info!(
            "{} {}round {}: Persisting... done in {} ms",
            self.strategy(),
            if warmup { "warmup " } else { "" },
            round,
            elapsed.as_secs_f64() * 1000.0
        );

        let actual = self.db.count().await?;
        if actual != expected {
            return Err(BulkError::CountMismatch { expected, actual });
        }

        Ok(RoundResult::new(round, warmup, n, elapsed))
    }

    /// Warmup rounds, then measured rounds. Stops at the first error.
    pub async fn run(&self) -> Result<BenchmarkReport, BulkError> {
        self.config.validate()?;
        let started_at = Utc::now();
        let mut rounds = Vec::new();

        for round in 0..self.config.warmup_rounds {
            rounds.push(self.run_round(round, true).await?);
        }
        for round in 0..self.config.rounds {
            rounds.push(self.run_round(round, false).await?);
        }

        let report = BenchmarkReport::new(self.strategy(), self.config.entities, started_at, rounds);
        info!("{}", report);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::DatabaseConfig;
    use crate::model::Customer;
    use async_trait::async_trait;

    /// Drops the last entity.
    struct Lossy(Database);

    #[async_trait]
    impl BulkOperations for Lossy {
        fn name(&self) -> &'static str {
            "lossy"
        }

        async fn bulk_persist(&self, entities: &[Customer]) -> Result<(), BulkError> {
            let keep = entities.len().saturating_sub(1);
            crate::bulk::SingleInsert::new(self.0.clone())
                .bulk_persist(&entities[..keep])
                .await
        }
    }

    /// Commits chunk by chunk, then fails on a repeated first id.
    struct DuplicateTail(Database);

    #[async_trait]
    impl BulkOperations for DuplicateTail {
        fn name(&self) -> &'static str {
            "duplicate_tail"
        }

        async fn bulk_persist(&self, entities: &[Customer]) -> Result<(), BulkError> {
            let mut with_duplicate = entities.to_vec();
            with_duplicate.extend(entities.first().copied());
            crate::bulk::ChunkedInsert::new(self.0.clone(), 10)
                .bulk_persist(&with_duplicate)
                .await
        }
    }

    fn small_config(entities: usize) -> BenchmarkConfig {
        BenchmarkConfig {
            entities,
            rounds: 2,
            warmup_rounds: 1,
            ..BenchmarkConfig::default()
        }
    }

    #[tokio::test]
    async fn test_count_mismatch_detected_and_cleaned() {
        let db = Database::connect(&DatabaseConfig::default()).await.unwrap();
        let runner = BenchmarkRunner::new(db.clone(), Box::new(Lossy(db.clone())), small_config(10));

        let err = runner.run_round(0, false).await;
        assert_eq!(
            err,
            Err(BulkError::CountMismatch {
                expected: 10,
                actual: 9
            })
        );
        assert_eq!(db.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_persist_cleaned_and_error_kept() {
        let db = Database::connect(&DatabaseConfig::default()).await.unwrap();
        let runner = BenchmarkRunner::new(
            db.clone(),
            Box::new(DuplicateTail(db.clone())),
            small_config(50),
        );

        let err = runner.run_round(0, false).await;

        assert!(matches!(err, Err(BulkError::DatabaseError(_))));
        assert_eq!(db.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_run_rejects_overflowing_rounds() {
        let db = Database::connect(&DatabaseConfig::default()).await.unwrap();
        let config = BenchmarkConfig {
            rounds: u32::MAX,
            warmup_rounds: 1,
            ..small_config(10)
        };
        let ops = crate::bulk::StrategyKind::Single.build(db.clone(), 10);
        let runner = BenchmarkRunner::new(db.clone(), ops, config);

        let err = runner.run().await;

        assert!(matches!(err, Err(BulkError::ConfigParsingError(_))));
        assert_eq!(db.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_run_counts_rounds() {
        let db = Database::connect(&DatabaseConfig::default()).await.unwrap();
        let ops = crate::bulk::StrategyKind::MultiValues.build(db.clone(), 100);
        let runner = BenchmarkRunner::new(db.clone(), ops, small_config(250));

        let report = runner.run().await.unwrap();

        assert_eq!(report.strategy, "multi_values");
        assert_eq!(report.rounds.len(), 3);
        assert_eq!(report.measured_rounds(), 2);
        assert!(report.rounds[0].warmup);
        assert!(report.stats.is_some());
        assert_eq!(db.count().await.unwrap(), 0);
    }
}
