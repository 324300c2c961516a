use serde::{Deserialize, Serialize};

use crate::bulk::StrategyKind;
use crate::core::BulkError;

/// SQLite's host parameter limit. Each customer row binds one parameter.
pub const MAX_BATCH_SIZE: usize = 32766;

/// Upper bound on warmup plus measured rounds.
pub const MAX_ROUNDS: u32 = 100_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BenchmarkConfig {
    #[serde(default = "BenchmarkConfig::default_entities")]
    pub entities: usize,
    #[serde(default = "BenchmarkConfig::default_rounds")]
    pub rounds: u32,
    #[serde(default = "BenchmarkConfig::default_warmup_rounds")]
    pub warmup_rounds: u32,
    #[serde(default = "BenchmarkConfig::default_batch_size")]
    pub batch_size: usize,
    #[serde(default)]
    pub shuffle: bool,
    #[serde(default = "BenchmarkConfig::default_seed")]
    pub seed: u64,
    #[serde(default = "BenchmarkConfig::default_strategies")]
    pub strategies: Vec<StrategyKind>,
}

impl BenchmarkConfig {
    fn default_entities() -> usize {
        500_000
    }

    fn default_rounds() -> u32 {
        10
    }

    fn default_warmup_rounds() -> u32 {
        1
    }

    fn default_batch_size() -> usize {
        1000
    }

    fn default_seed() -> u64 {
        42
    }

    fn default_strategies() -> Vec<StrategyKind> {
        StrategyKind::ALL.to_vec()
    }

    pub fn validate(&self) -> Result<(), BulkError> {
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(BulkError::ConfigParsingError(format!(
                "benchmark.batch_size must be in 1..={}, got {}",
                MAX_BATCH_SIZE, self.batch_size
            )));
        }
        if i64::try_from(self.entities).is_err() {
            return Err(BulkError::ConfigParsingError(format!(
                "benchmark.entities too large: {}",
                self.entities
            )));
        }
        match self.warmup_rounds.checked_add(self.rounds) {
            Some(total) if total <= MAX_ROUNDS => {}
            _ => {
                return Err(BulkError::ConfigParsingError(format!(
                    "benchmark.warmup_rounds + benchmark.rounds must be at most {}, got {} + {}",
                    MAX_ROUNDS, self.warmup_rounds, self.rounds
                )));
            }
        }
        if self.strategies.is_empty() {
            return Err(BulkError::ConfigParsingError(
                "benchmark.strategies must name at least one strategy".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            entities: Self::default_entities(),
            rounds: Self::default_rounds(),
            warmup_rounds: Self::default_warmup_rounds(),
            batch_size: Self::default_batch_size(),
            shuffle: false,
            seed: Self::default_seed(),
            strategies: Self::default_strategies(),
        }
    }
}
