//! Logger initialization.
//!
//! Batch workers run as sibling processes that often share one terminal or
//! log collector, so every line carries the process id.

use std::io::Write;

use colored::*;
use log::{Level, LevelFilter};
use serde_json::json;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;

const CRATE_TARGET_PREFIX: &str = "favicon_finder::";

/// Dependencies that are chatty at debug level.
const QUIET_MODULES: &[(&str, LevelFilter)] = &[
    ("html5ever", LevelFilter::Error),
    ("selectors", LevelFilter::Warn),
    ("reqwest", LevelFilter::Info),
    ("hyper", LevelFilter::Info),
    ("hyper_util", LevelFilter::Info),
    ("rustls", LevelFilter::Warn),
];

/// `favicon_finder::inspector::html` -> `inspector::html`
fn short_target(target: &str) -> &str {
    target.strip_prefix(CRATE_TARGET_PREFIX).unwrap_or(target)
}

fn colored_level(level: Level) -> ColoredString {
    let name = format!("{:<5}", level);
    match level {
        Level::Error => name.red(),
        Level::Warn => name.yellow(),
        Level::Info => name.green(),
        Level::Debug => name.blue(),
        Level::Trace => name.purple(),
    }
}

fn plain_line(time: &str, pid: u32, level: Level, target: &str, message: &str) -> String {
    format!(
        "{} {} {} {} {}",
        time,
        format!("[{pid}]").dimmed(),
        colored_level(level),
        short_target(target).cyan(),
        message
    )
}

fn json_line(ts_millis: i64, pid: u32, level: Level, target: &str, message: &str) -> String {
    json!({
        "ts": ts_millis,
        "pid": pid,
        "level": level.as_str(),
        "target": target,
        "msg": message,
    })
    .to_string()
}

/// Initializes the logger with the specified level and format.
///
/// The logger reads `RUST_LOG` first; `level` then overrides the global and
/// crate levels. Noisy dependencies stay clamped either way.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// # Override with CLI args (takes precedence)
/// RUST_LOG=debug favicon_finder find yahoo.com --log-level info
///
/// # Per-module filtering via RUST_LOG
/// RUST_LOG=favicon_finder=debug,reqwest=info favicon_finder batch 1
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    for (module, filter) in QUIET_MODULES {
        builder.filter_module(module, *filter);
    }
    builder.filter_module("favicon_finder", level);

    let pid = std::process::id();
    match format {
        LogFormat::Json => {
            builder.format(move |buf, record| {
                writeln!(
                    buf,
                    "{}",
                    json_line(
                        chrono::Utc::now().timestamp_millis(),
                        pid,
                        record.level(),
                        record.target(),
                        &record.args().to_string()
                    )
                )
            });
        }
        LogFormat::Plain => {
            builder.format(move |buf, record| {
                writeln!(
                    buf,
                    "{}",
                    plain_line(
                        &chrono::Local::now().format("%H:%M:%S").to_string(),
                        pid,
                        record.level(),
                        record.target(),
                        &record.args().to_string()
                    )
                )
            });
        }
    }

    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_target() {
        assert_eq!(short_target("favicon_finder::inspector::html"), "inspector::html");
        assert_eq!(short_target("favicon_finder"), "favicon_finder");
        assert_eq!(short_target("reqwest::connect"), "reqwest::connect");
    }

    #[test]
    fn test_plain_line_layout() {
        colored::control::set_override(false);
        let line = plain_line(
            "12:00:01",
            4242,
            Level::Warn,
            "favicon_finder::resolver",
            "headers strategy failed",
        );
        assert_eq!(line, "12:00:01 [4242] WARN  resolver headers strategy failed");
    }

    #[test]
    fn test_json_line_escapes_message() {
        let line = json_line(
            1_700_000_000_000,
            7,
            Level::Info,
            "favicon_finder::run",
            "quote \" and\nnewline",
        );
        let value: serde_json::Value = serde_json::from_str(&line).expect("line should be JSON");
        assert_eq!(value["pid"], 7);
        assert_eq!(value["level"], "INFO");
        assert_eq!(value["target"], "favicon_finder::run");
        assert_eq!(value["msg"], "quote \" and\nnewline");
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_init_logger_repeated_does_not_panic() {
        // Only the first initialization in a process succeeds
        for format in [LogFormat::Plain, LogFormat::Json] {
            let result = init_logger_with(LevelFilter::Info, format);
            assert!(result.is_ok() || matches!(result, Err(InitializationError::LoggerError(_))));
        }
    }
}
