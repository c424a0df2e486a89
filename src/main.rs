//! Stress-tests a `BinarySemaphore` from the `axiom-ticket` crate.
//!
//! Spawns `--threads` workers that each enter the critical section
//! `--iterations` times, then verifies exclusion, FIFO order and that no
//! increment was lost. Set `RUST_LOG=debug` for per-worker progress.

use std::process::ExitCode;

use axiom_ticket::stress::{self, StressConfig};
use axiom_ticket::ThreadScope;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "axiom-ticket", version, about = "Stress-test the fair ticket semaphore")]
struct Cli {
    /// Number of concurrent workers
    #[arg(short, long, env = "AXIOM_THREADS", default_value_t = 8)]
    threads: usize,

    /// Critical sections entered per worker
    #[arg(short, long, env = "AXIOM_ITERATIONS", default_value_t = 10_000)]
    iterations: usize,

    /// Visibility scope: block, device or system
    #[arg(short, long, env = "AXIOM_SCOPE", default_value_t = ThreadScope::System)]
    scope: ThreadScope,
}

impl From<Cli> for StressConfig {
    fn from(cli: Cli) -> Self {
        StressConfig {
            threads: cli.threads,
            iterations: cli.iterations,
            scope: cli.scope,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = StressConfig::from(Cli::parse());
    match stress::run(&config) {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
