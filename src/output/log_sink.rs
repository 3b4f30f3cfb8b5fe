//! Timestamped line logs.
//!
//! Caught fetch errors and batch completions are recorded as plain text lines
//! in files next to the results. Recording is best-effort: a line that cannot
//! be written is reported through `log` and otherwise dropped.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::warn;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Destination for free-text log lines.
pub trait LogSink: Send + Sync {
    /// Records one line. Never fails; delivery is best-effort.
    fn write_line(&self, line: &str);
}

fn timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// `<timestamp> <message>`
pub fn format_error_line(message: &str) -> String {
    format!("{} {}", timestamp(), message)
}

/// `[<timestamp>] start:<start>, offset:<offset> completed in <secs>s.`
pub fn format_runtime_line(start: usize, offset: usize, elapsed_secs: u64) -> String {
    format!(
        "[{}] start:{}, offset:{} completed in {}s.",
        timestamp(),
        start,
        offset,
        elapsed_secs
    )
}

/// Appends lines to a file, creating it (and its directory) on first write.
#[derive(Debug, Clone)]
pub struct FileLogSink {
    path: PathBuf,
}

impl FileLogSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }
}

impl LogSink for FileLogSink {
    fn write_line(&self, line: &str) {
        if let Err(e) = self.append(line) {
            warn!("Failed to write log line to {}: {}", self.path.display(), e);
        }
    }
}

/// Keeps lines in memory.
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    lines: Mutex<Vec<String>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines recorded so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl LogSink for MemoryLogSink {
    fn write_line(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line.to_string());
    }
}
