use clap::Parser;
use log::kv::{ToValue, Value};

use crate::bulk::StrategyKind;

#[derive(Parser, Debug, PartialEq)]
#[command(version, about)]
pub struct CliArgs {
    /// Path to a TOML config file.
    #[arg(short, long)]
    pub config: Option<String>,
    /// Strategy to benchmark, may be repeated. Overrides the config.
    #[arg(short, long, value_enum)]
    pub strategy: Vec<StrategyKind>,
    /// Number of entities persisted per round.
    #[arg(short, long)]
    pub entities: Option<usize>,
    /// Number of measured rounds.
    #[arg(short, long)]
    pub rounds: Option<u32>,
    /// Number of unmeasured warmup rounds.
    #[arg(short, long)]
    pub warmup_rounds: Option<u32>,
    /// Write all reports as JSON to this path.
    #[arg(long)]
    pub report: Option<String>,
}

impl ToValue for CliArgs {
    fn to_value(&self) -> Value<'_> {
        Value::from_debug(self)
    }
}
