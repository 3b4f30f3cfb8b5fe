//! Ranked domain list input.
//!
//! The list is a headerless CSV of `rank,domain` rows (e.g. a top-1m export).
//! Workers read a fixed window of it by 1-based row number.

use std::path::Path;

use csv::ReaderBuilder;
use log::warn;

use crate::error_handling::InputError;

/// One row of the ranked domain list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEntry {
    pub rank: u64,
    pub domain: String,
}

impl DomainEntry {
    pub fn new(rank: u64, domain: impl Into<String>) -> Self {
        Self {
            rank,
            domain: domain.into(),
        }
    }
}

/// Loads rows `start ..= start + offset - 1` (1-based) of the CSV at `path`.
///
/// Malformed rows (missing domain, non-integer rank, invalid UTF-8) still
/// occupy their row number but are skipped with a warning. A window running
/// past the end of the file yields the remaining rows.
///
/// # Errors
///
/// Returns `InputError::InvalidRange` if `start` or `offset` is 0, before the
/// file is touched, and `InputError::Open`/`InputError::Read` on CSV I/O
/// failures.
pub fn load_range(path: &Path, start: usize, offset: usize) -> Result<Vec<DomainEntry>, InputError> {
    if start < 1 || offset < 1 {
        return Err(InputError::InvalidRange { start, offset });
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| InputError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let end = start.saturating_add(offset);
    let mut entries = Vec::with_capacity(offset.min(crate::config::DEFAULT_BATCH_SIZE));

    for (index, record) in reader.byte_records().enumerate() {
        let row = index + 1;
        if row < start {
            continue;
        }
        if row >= end {
            break;
        }

        let record = record?;
        let field = |i: usize| {
            record
                .get(i)
                .and_then(|f| std::str::from_utf8(f).ok())
                .map(str::trim)
        };
        let rank = field(0).and_then(|r| r.parse::<u64>().ok());
        let domain = field(1).filter(|d| !d.is_empty());

        match (rank, domain) {
            (Some(rank), Some(domain)) => entries.push(DomainEntry::new(rank, domain)),
            _ => warn!(
                "Skipping malformed row {} in {}: {:?}",
                row,
                path.display(),
                record
            ),
        }
    }

    Ok(entries)
}
