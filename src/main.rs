use std::path::Path;

use anyhow::Context;
use clap::Parser;
use log::info;

use bulkops::bench::{BenchmarkReport, BenchmarkRunner, write_reports};
use bulkops::conf::Config;
use bulkops::core::{CliArgs, setup_logging};
use bulkops::db::Database;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    setup_logging();
    let args = CliArgs::parse();
    info!(args = args; "bulkops started.");

    let config = load_config(&args)?;
    let db = Database::connect(&config.database)
        .await
        .context("failed to open database")?;

    let mut reports: Vec<BenchmarkReport> = Vec::with_capacity(config.benchmark.strategies.len());
    for kind in &config.benchmark.strategies {
        let operations = kind.build(db.clone(), config.benchmark.batch_size);
        let runner = BenchmarkRunner::new(db.clone(), operations, config.benchmark.clone());
        let report = runner
            .run()
            .await
            .with_context(|| format!("benchmark '{}' failed", runner.strategy()))?;
        println!("{}", report);
        reports.push(report);
    }

    if let Some(path) = &args.report {
        write_reports(Path::new(path), &reports).context("failed to write report")?;
        info!("Report written to {}", path);
    }

    db.close().await;
    Ok(())
}

fn load_config(args: &CliArgs) -> anyhow::Result<Config> {
    let mut config = Config::load(args.config.as_deref().map(Path::new))?;

    if !args.strategy.is_empty() {
        config.benchmark.strategies = args.strategy.clone();
    }
    if let Some(entities) = args.entities {
        config.benchmark.entities = entities;
    }
    if let Some(rounds) = args.rounds {
        config.benchmark.rounds = rounds;
    }
    if let Some(warmup_rounds) = args.warmup_rounds {
        config.benchmark.warmup_rounds = warmup_rounds;
    }
    config.validate()?;

    Ok(config)
}
