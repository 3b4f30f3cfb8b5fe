//! Application entry points behind the CLI subcommands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;

use crate::config::{Config, WORKERS_RUNTIME_LOG_FILE, WORKER_CSV_DIR, WORKER_LOG_DIR};
use crate::error_handling::InputError;
use crate::input::load_range;
use crate::launcher::{plan_group, spawn_workers};
use crate::output::{CsvResultSink, FileLogSink, LogSink};
use crate::resolver::{BatchReport, FaviconResolver};

/// `<output_dir>/worker_csv/<start>.csv`
pub fn worker_csv_path(output_dir: &Path, start: usize) -> PathBuf {
    output_dir.join(WORKER_CSV_DIR).join(format!("{start}.csv"))
}

/// `<output_dir>/worker_log/<start>.log`
pub fn worker_log_path(output_dir: &Path, start: usize) -> PathBuf {
    output_dir.join(WORKER_LOG_DIR).join(format!("{start}.log"))
}

/// `<output_dir>/workers.log`
pub fn runtime_log_path(output_dir: &Path) -> PathBuf {
    output_dir.join(WORKERS_RUNTIME_LOG_FILE)
}

/// Resolves one domain and prints `Favicon for <domain>: <url>`.
///
/// Caught fetch errors go to `config.log_file`. Returns the URL, empty when
/// nothing was found.
pub async fn run_single(config: &Config, domain: &str) -> Result<String> {
    let error_sink: Arc<dyn LogSink> = Arc::new(FileLogSink::new(&config.log_file));
    let resolver = FaviconResolver::new(config.resolver.clone(), error_sink)
        .context("Failed to initialize favicon resolver")?;

    let favicon_url = resolver.resolve(domain).await;
    println!("Favicon for {}: {}", domain, favicon_url);
    Ok(favicon_url)
}

/// Resolves rows `start ..= start + offset - 1` of `config.input_csv`.
///
/// Results overwrite `worker_csv/<start>.csv`, caught errors are appended to
/// `worker_log/<start>.log`, and a completion line is appended to
/// `workers.log`, all under `config.output_dir`. `offset` defaults to
/// `config.batch_size`.
pub async fn run_batch(config: &Config, start: usize, offset: Option<usize>) -> Result<BatchReport> {
    let offset = offset.unwrap_or(config.batch_size);
    let entries = load_range(&config.input_csv, start, offset).with_context(|| {
        format!(
            "Failed to load rows start:{} offset:{} from {}",
            start,
            offset,
            config.input_csv.display()
        )
    })?;
    info!(
        "Loaded {} domains (start:{}, offset:{}) from {}",
        entries.len(),
        start,
        offset,
        config.input_csv.display()
    );

    let error_sink: Arc<dyn LogSink> =
        Arc::new(FileLogSink::new(worker_log_path(&config.output_dir, start)));
    let resolver = FaviconResolver::new(config.resolver.clone(), error_sink)
        .context("Failed to initialize favicon resolver")?;

    let mut sink = CsvResultSink::create(&worker_csv_path(&config.output_dir, start))?;
    let report = resolver
        .resolve_batch(start, offset, &entries, &mut sink)
        .await?;

    FileLogSink::new(runtime_log_path(&config.output_dir)).write_line(&report.runtime_line());
    Ok(report)
}

/// Spawns the workers of one group. Returns their PIDs.
pub fn run_spawn(config: &Config, group: usize, double: bool) -> Result<Vec<u32>> {
    let plan = plan_group(group, double)?;
    let pids = spawn_workers(&plan, config)?;
    println!(
        "Worker init {} initiated, {} workers spawned.",
        group,
        pids.len()
    );
    Ok(pids)
}

/// Spawns the workers of groups `1 ..= count`.
pub fn run_spawn_groups(config: &Config, count: usize, double: bool) -> Result<Vec<u32>> {
    if count < 1 {
        return Err(InputError::InvalidGroup(count).into());
    }
    let mut pids = Vec::new();
    for group in 1..=count {
        pids.extend(run_spawn(config, group, double)?);
    }
    info!("{} groups initiated, {} workers spawned", count, pids.len());
    Ok(pids)
}
