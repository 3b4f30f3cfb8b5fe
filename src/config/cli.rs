//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::constants::{DEFAULT_INPUT_CSV, DEFAULT_LOG_FILE, DEFAULT_OUTPUT_DIR};
use crate::config::types::{Config, LogFormat, LogLevel};

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Single domain
/// favicon_finder find facebook.com
///
/// # Resolve rows 1..=1000 of the input CSV into output/worker_csv/1.csv
/// favicon_finder batch 1
///
/// # Spawn the ten workers covering rows 10001..=20000
/// favicon_finder spawn 2
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "favicon_finder",
    about = "Finds favicon URLs for domains by probing headers and parsing HTML."
)]
pub struct Cli {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Ranked domain CSV (`rank,domain` rows)
    #[arg(long, global = true, env = "FAVICON_INPUT_CSV", default_value = DEFAULT_INPUT_CSV)]
    pub input_csv: PathBuf,

    /// Writable directory for worker output and logs
    #[arg(long, global = true, env = "FAVICON_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Error log for single-domain lookups
    #[arg(long, global = true, env = "FAVICON_LOG_FILE", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Rows resolved per batch when `--offset` is not given
    #[arg(long, global = true, env = "FAVICON_BATCH_SIZE", default_value_t = 1000)]
    pub batch_size: usize,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Find the favicon of a single domain
    Find {
        /// Domain to inspect (e.g. yahoo.com)
        domain: String,
    },
    /// Resolve a range of the input CSV into `<output_dir>/worker_csv/<start>.csv`
    Batch {
        /// First CSV row to resolve (1-based)
        start: usize,
        /// Number of rows to resolve (defaults to the batch size)
        #[arg(long)]
        offset: Option<usize>,
    },
    /// Spawn the batch workers of one 10k-row group
    Spawn {
        /// Group number (1-based); group N covers rows (N-1)*10000+1 ..= N*10000
        group: usize,
        /// Run two 500-row workers per 1000 rows
        #[arg(long)]
        double: bool,
    },
    /// Spawn the batch workers of groups 1 ..= count
    SpawnGroups {
        /// Number of groups to launch
        count: usize,
        /// Run two 500-row workers per 1000 rows
        #[arg(long)]
        double: bool,
    },
}

impl Cli {
    /// Builds the library configuration from the parsed options.
    pub fn to_config(&self) -> Config {
        Config {
            input_csv: self.input_csv.clone(),
            output_dir: self.output_dir.clone(),
            log_file: self.log_file.clone(),
            batch_size: self.batch_size,
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
            ..Default::default()
        }
    }
}
