//! Result records and CSV output.
//!
//! One row per input domain: `rank,domain,favicon_url`, no header row. A
//! domain without a favicon keeps its row with an empty third field.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{Writer, WriterBuilder};

/// Resolution outcome for one ranked domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaviconRecord {
    pub rank: u64,
    pub domain: String,
    /// Favicon URL, empty when none was found
    pub favicon_url: String,
}

/// Destination for resolution results.
pub trait ResultSink {
    fn write_record(&mut self, record: &FaviconRecord) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl ResultSink for Vec<FaviconRecord> {
    fn write_record(&mut self, record: &FaviconRecord) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// Writes records as headerless CSV rows.
pub struct CsvResultSink<W: Write> {
    writer: Writer<W>,
}

impl CsvResultSink<File> {
    /// Creates (or truncates) `path`, creating its directory if needed.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory {}", parent.display())
                })?;
            }
        }
        let writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .with_context(|| format!("Failed to create result file {}", path.display()))?;
        Ok(Self { writer })
    }
}

impl<W: Write> CsvResultSink<W> {
    pub fn from_writer(inner: W) -> Self {
        Self {
            writer: WriterBuilder::new().has_headers(false).from_writer(inner),
        }
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e.error()))
    }
}

impl<W: Write> ResultSink for CsvResultSink<W> {
    fn write_record(&mut self, record: &FaviconRecord) -> Result<()> {
        self.writer
            .write_record([
                record.rank.to_string().as_str(),
                record.domain.as_str(),
                record.favicon_url.as_str(),
            ])
            .with_context(|| format!("Failed to write result row for {}", record.domain))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush result file")
    }
}
