use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::BulkError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundResult {
    pub round: u32,
    pub warmup: bool,
    pub rows: usize,
    pub elapsed_ms: f64,
}

impl RoundResult {
    pub fn new(round: u32, warmup: bool, rows: usize, elapsed: Duration) -> Self {
        Self {
            round,
            warmup,
            rows,
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
        }
    }
}

/// Statistics over measured rounds. Standard deviation is the population one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundStats {
    pub mean_ms: f64,
    pub stddev_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub rows_per_sec: f64,
}

impl RoundStats {
    pub fn from_rounds(rounds: &[RoundResult], rows: usize) -> Option<Self> {
        let measured: Vec<f64> = rounds
            .iter()
            .filter(|r| !r.warmup)
            .map(|r| r.elapsed_ms)
            .collect();
        if measured.is_empty() {
            return None;
        }

        let n = measured.len() as f64;
        let mean_ms = measured.iter().sum::<f64>() / n;
        let variance = measured.iter().map(|v| (v - mean_ms).powi(2)).sum::<f64>() / n;
        let min_ms = measured.iter().copied().fold(f64::INFINITY, f64::min);
        let max_ms = measured.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let rows_per_sec = if mean_ms > 0.0 {
            rows as f64 * 1000.0 / mean_ms
        } else {
            0.0
        };

        Some(Self {
            mean_ms,
            stddev_ms: variance.sqrt(),
            min_ms,
            max_ms,
            rows_per_sec,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BenchmarkReport {
    pub strategy: String,
    pub entities: usize,
    pub started_at: DateTime<Utc>,
    pub rounds: Vec<RoundResult>,
    pub stats: Option<RoundStats>,
}

impl BenchmarkReport {
    pub fn new(
        strategy: &str,
        entities: usize,
        started_at: DateTime<Utc>,
        rounds: Vec<RoundResult>,
    ) -> Self {
        let stats = RoundStats::from_rounds(&rounds, entities);
        Self {
            strategy: strategy.to_string(),
            entities,
            started_at,
            rounds,
            stats,
        }
    }

    pub fn measured_rounds(&self) -> usize {
        self.rounds.iter().filter(|r| !r.warmup).count()
    }
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.stats {
            Some(s) => write!(
                f,
                "{}: {} rows, rounds: {}, round: {:.3} ms [+- {:.3}], min: {:.3}, max: {:.3}, {:.0} rows/s",
                self.strategy,
                self.entities,
                self.measured_rounds(),
                s.mean_ms,
                s.stddev_ms,
                s.min_ms,
                s.max_ms,
                s.rows_per_sec
            ),
            None => write!(
                f,
                "{}: {} rows, no measured rounds",
                self.strategy, self.entities
            ),
        }
    }
}

/// Writes `reports` as a pretty-printed JSON array.
pub fn write_reports(path: &Path, reports: &[BenchmarkReport]) -> Result<(), BulkError> {
    let file = File::create(path)
        .map_err(|e| BulkError::IoError(format!("creating {}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, reports)?;
    writer.flush()?;
    Ok(())
}
