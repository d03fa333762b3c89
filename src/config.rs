use std::fmt::{Display, Formatter};

use anyhow::{Result, ensure};
use clap::{Parser, ValueEnum};
use thousands::Separable;

const DEFAULT_BATCH_SIZE: i64 = 256;

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Address of the database node to connect to
    #[arg(long, default_value = "scylla:9042")]
    pub address: String,

    /// Type of work to perform
    #[arg(long, value_enum, default_value_t = Workload::Mixed)]
    pub workload: Workload,

    /// Total number of tasks (requests) to perform during the benchmark.
    /// A mixed workload performs one insert and one select per task.
    #[arg(long, default_value_t = 1_000_000)]
    pub tasks: i64,

    /// Maximum number of requests performed at once
    #[arg(long, default_value_t = 256)]
    pub concurrency: i64,

    /// Don't recreate the schema or insert rows before the benchmark
    #[arg(long)]
    pub no_prepare: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Workload {
    Inserts,
    Selects,
    Mixed,
}

impl Display for Workload {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Workload::Inserts => "inserts",
            Workload::Selects => "selects",
            Workload::Mixed => "mixed",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug)]
pub struct Config {
    pub address: String,
    pub workload: Workload,
    pub tasks: i64,
    pub concurrency: i64,
    pub batch_size: i64,
    pub no_prepare: bool,
}

impl Config {
    pub fn resolve(cli: Cli) -> Result<Config> {
        ensure!(cli.tasks >= 1, "tasks must be at least 1");
        ensure!(cli.concurrency >= 1, "concurrency must be at least 1");

        // Shrink batches when there would be fewer of them than workers,
        // so no worker sits idle while work remains.
        let mut batch_size = DEFAULT_BATCH_SIZE;
        if cli.tasks / batch_size < cli.concurrency {
            batch_size = (cli.tasks / cli.concurrency).max(1);
        }

        Ok(Config {
            address: cli.address,
            workload: cli.workload,
            tasks: cli.tasks,
            concurrency: cli.concurrency,
            batch_size,
            no_prepare: cli.no_prepare,
        })
    }
}

impl Display for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "address: {} | workload: {} | tasks: {} | concurrency: {} | batch size: {}{}",
            self.address,
            self.workload,
            self.tasks.separate_with_underscores(),
            self.concurrency,
            self.batch_size,
            if self.no_prepare { " | no-prepare" } else { "" },
        )
    }
}
