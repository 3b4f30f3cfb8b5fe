//! Configuration types.
//!
//! This module defines the library configuration structs and the logging
//! enums shared with the CLI.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use crate::config::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_INPUT_CSV, DEFAULT_LOG_FILE, DEFAULT_OUTPUT_DIR, DEFAULT_SCHEME,
    DEFAULT_USER_AGENT, HEADER_PROBE_TIMEOUT, HTML_CONNECT_TIMEOUT, HTML_TIMEOUT,
    MAX_HTML_REDIRECTS, MAX_LOCATION_REDIRECTS, MAX_TRANSPORT_HOPS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Network settings for both inspection strategies.
///
/// Every fetch builds its transport from these values; nothing is stored in
/// process-wide state, so sibling batch workers never influence each other.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Scheme used to turn a bare domain into a URL (`https` in production)
    pub scheme: String,
    /// Header probe timeout, applied to connect and to the whole request
    pub probe_timeout: Duration,
    /// Homepage fetch connect timeout
    pub html_connect_timeout: Duration,
    /// Homepage fetch total timeout
    pub html_timeout: Duration,
    /// `Location` hops followed by the header inspector, initial response included
    pub max_location_redirects: usize,
    /// Redirects followed automatically by the homepage fetch
    pub max_html_redirects: usize,
    /// Hops captured by a single header fetch before it is abandoned
    pub max_transport_hops: usize,
    /// User-Agent sent with homepage requests
    pub user_agent: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            probe_timeout: HEADER_PROBE_TIMEOUT,
            html_connect_timeout: HTML_CONNECT_TIMEOUT,
            html_timeout: HTML_TIMEOUT,
            max_location_redirects: MAX_LOCATION_REDIRECTS,
            max_html_redirects: MAX_HTML_REDIRECTS,
            max_transport_hops: MAX_TRANSPORT_HOPS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Application configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use favicon_finder::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     output_dir: PathBuf::from("/tmp/favicons"),
///     batch_size: 500,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Ranked domain list (`rank,domain` rows, no header)
    pub input_csv: PathBuf,

    /// Writable directory for worker CSV output and logs
    pub output_dir: PathBuf,

    /// Error log used outside of batch mode
    pub log_file: PathBuf,

    /// Rows per batch when no explicit offset is given
    pub batch_size: usize,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Network settings
    pub resolver: ResolverConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_csv: PathBuf::from(DEFAULT_INPUT_CSV),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            batch_size: DEFAULT_BATCH_SIZE,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            resolver: ResolverConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_resolver_config_default() {
        let config = ResolverConfig::default();
        assert_eq!(config.scheme, "https");
        assert_eq!(config.probe_timeout, Duration::from_secs(2));
        assert_eq!(config.html_connect_timeout, Duration::from_secs(2));
        assert_eq!(config.html_timeout, Duration::from_secs(2));
        assert_eq!(config.max_location_redirects, 3);
        assert_eq!(config.max_html_redirects, 3);
        assert!(config.user_agent.contains("Chrome/80"));
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.input_csv, PathBuf::from("./input/top-1m.csv"));
        assert_eq!(config.output_dir, PathBuf::from("./output"));
        assert_eq!(config.log_file, PathBuf::from("./output/app.log"));
    }
}
