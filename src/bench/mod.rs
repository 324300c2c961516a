mod report;
mod runner;

pub use report::{BenchmarkReport, RoundResult, RoundStats, write_reports};
pub use runner::BenchmarkRunner;
