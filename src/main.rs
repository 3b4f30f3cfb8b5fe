//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `favicon_finder` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use favicon_finder::config::{Cli, Command};
use favicon_finder::initialization::init_logger_with;
use favicon_finder::run::{run_batch, run_single, run_spawn, run_spawn_groups};

#[tokio::main]
async fn main() -> Result<()> {
    // Load FAVICON_* variables from .env, in the current directory or next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();
    let config = cli.to_config();

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let outcome = match cli.command {
        Command::Find { domain } => run_single(&config, &domain).await.map(|_| ()),
        Command::Batch { start, offset } => run_batch(&config, start, offset).await.map(|report| {
            println!(
                "Resolved {} domain{} ({} favicon{} found, {} caught error{}) in {}s - see {}",
                report.processed,
                if report.processed == 1 { "" } else { "s" },
                report.found,
                if report.found == 1 { "" } else { "s" },
                report.total_errors(),
                if report.total_errors() == 1 { "" } else { "s" },
                report.elapsed.as_secs(),
                favicon_finder::run::worker_csv_path(&config.output_dir, start).display()
            );
        }),
        Command::Spawn { group, double } => run_spawn(&config, group, double).map(|_| ()),
        Command::SpawnGroups { count, double } => {
            run_spawn_groups(&config, count, double).map(|_| ())
        }
    };

    if let Err(e) = outcome {
        eprintln!("favicon_finder error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}
