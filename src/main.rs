mod config;
mod database;
mod partitioner;
mod workload;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use thousands::Separable;

use crate::config::{Cli, Config, Workload};
use crate::database::Database;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Arc::new(Config::resolve(Cli::parse())?);
    println!("Benchmark configuration: {config}");

    let db = Arc::new(Database::connect(&config.address, !config.no_prepare).await?);

    if config.workload == Workload::Selects && !config.no_prepare {
        println!("Preparing a selects benchmark (inserting values)...");
        workload::run_pool(&db, &config, Workload::Inserts).await?;
    }

    println!("Starting the benchmark");

    let start = Instant::now();
    workload::run_pool(&db, &config, config.workload).await?;
    let elapsed = start.elapsed();

    println!("Finished");
    println!("Benchmark time: {} ms", elapsed.as_millis());

    // A mixed workload performs one insert and one select per task.
    let ops = match config.workload {
        Workload::Mixed => 2 * config.tasks,
        Workload::Inserts | Workload::Selects => config.tasks,
    };
    if !elapsed.is_zero() {
        let per_sec = (ops as f64 / elapsed.as_secs_f64()) as u64;
        println!("Throughput: {} ops/s", per_sec.separate_with_underscores());
    }

    Ok(())
}
