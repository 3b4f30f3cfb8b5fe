//! Worker process launcher.
//!
//! A group covers 10,000 consecutive rows of the input CSV and is split into
//! independent `batch` worker processes. Workers share nothing; each writes
//! its own result file named after its start row.

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::config::{Config, DEFAULT_BATCH_SIZE, DOUBLE_WORKER_BATCH_SIZE, GROUP_SIZE};
use crate::error_handling::InputError;

/// Rows handled by one worker process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerRange {
    /// First row (1-based)
    pub start: usize,
    /// Number of rows
    pub offset: usize,
}

impl WorkerRange {
    /// Subcommand arguments that run this range.
    pub fn batch_args(&self) -> Vec<String> {
        vec![
            "batch".to_string(),
            self.start.to_string(),
            "--offset".to_string(),
            self.offset.to_string(),
        ]
    }
}

/// Splits group `group_id` (1-based) into worker ranges.
///
/// Group `g` covers rows `(g-1)*10000+1 ..= g*10000`: one worker per 1000
/// rows, or two 500-row workers per 1000 rows when `double` is set.
///
/// # Errors
///
/// Returns `InputError::InvalidGroup` for group 0.
pub fn plan_group(group_id: usize, double: bool) -> Result<Vec<WorkerRange>, InputError> {
    if group_id < 1 {
        return Err(InputError::InvalidGroup(group_id));
    }

    let first_row = (group_id - 1) * GROUP_SIZE + 1;
    let offset = if double {
        DOUBLE_WORKER_BATCH_SIZE
    } else {
        DEFAULT_BATCH_SIZE
    };

    Ok((first_row..first_row + GROUP_SIZE)
        .step_by(offset)
        .map(|start| WorkerRange { start, offset })
        .collect())
}

fn shared_args(config: &Config) -> Vec<OsString> {
    let mut args = Vec::new();
    for (flag, path) in [
        ("--input-csv", config.input_csv.as_path()),
        ("--output-dir", config.output_dir.as_path()),
        ("--log-file", config.log_file.as_path()),
    ] {
        args.push(OsString::from(flag));
        args.push(path.as_os_str().to_os_string());
    }
    args
}

/// Starts one detached worker process per range and returns their PIDs.
///
/// Workers run the current executable with `config`'s paths, discard their
/// stdio, and are not waited for.
///
/// # Errors
///
/// Fails if the current executable cannot be located or a process cannot be
/// started. Workers started before the failure keep running.
pub fn spawn_workers(plan: &[WorkerRange], config: &Config) -> Result<Vec<u32>> {
    let exe = std::env::current_exe().context("Failed to locate the current executable")?;
    spawn_workers_with(&exe, plan, config)
}

fn spawn_workers_with(program: &Path, plan: &[WorkerRange], config: &Config) -> Result<Vec<u32>> {
    let mut pids = Vec::with_capacity(plan.len());
    for range in plan {
        let child = Command::new(program)
            .args(shared_args(config))
            .args(range.batch_args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| {
                format!(
                    "Failed to spawn worker for start:{} offset:{}",
                    range.start, range.offset
                )
            })?;
        debug!(
            "Spawned worker {} for start:{} offset:{}",
            child.id(),
            range.start,
            range.offset
        );
        pids.push(child.id());
    }
    info!("{} workers spawned", pids.len());
    Ok(pids)
}
