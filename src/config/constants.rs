//! Configuration constants.
//!
//! This module defines the timeouts, limits, and fixed paths used by the
//! favicon inspectors and the batch runner.

use std::time::Duration;

// Header probe
/// Default favicon location probed on every domain
pub const FAVICON_PATH: &str = "/favicon.ico";
/// Header probe request timeout (connect and read)
pub const HEADER_PROBE_TIMEOUT: Duration = Duration::from_secs(2);
/// Maximum `Location` hops followed by the header inspector, counting the initial response
pub const MAX_LOCATION_REDIRECTS: usize = 3;
/// Maximum transport-level hops captured for a single header fetch.
/// Matches the redirect limit of a stock HTTP stream client; a self-redirecting
/// URL exhausts it and fails the fetch.
pub const MAX_TRANSPORT_HOPS: usize = 20;

/// Content types accepted as a favicon without further sniffing.
pub const FAVICON_CONTENT_TYPES: &[&str] = &[
    "image/x-icon",
    "image/vnd.microsoft.icon", // tmall.com
    "image/png",                // facebook.com
    "application/octet-stream", // downloadable, twitch.tv
];

// HTML inspection
/// Redirects followed automatically while fetching a homepage
pub const MAX_HTML_REDIRECTS: usize = 3;
/// TCP connect timeout for the homepage fetch
pub const HTML_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
/// Total timeout for the homepage fetch
pub const HTML_TIMEOUT: Duration = Duration::from_secs(2);
/// Maximum homepage body size in bytes (2MB).
/// Bytes past this limit are ignored; icon links live in `<head>`.
pub const MAX_HTML_BODY_SIZE: usize = 2 * 1024 * 1024;

/// Desktop browser User-Agent sent with homepage requests.
///
/// Some servers return a different (or no) document to unknown clients, so the
/// homepage fetch identifies as Chrome on macOS.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_3) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/80.0.3987.87 Safari/537.36";

/// Scheme used to build probe URLs from bare domains
pub const DEFAULT_SCHEME: &str = "https";

// Batch processing
/// Rows resolved by one batch worker when no offset is given
pub const DEFAULT_BATCH_SIZE: usize = 1000;
/// Rows handled by one launcher group
pub const GROUP_SIZE: usize = 10_000;
/// Rows per worker in double mode
pub const DOUBLE_WORKER_BATCH_SIZE: usize = 500;

// Default file locations
pub const DEFAULT_INPUT_CSV: &str = "./input/top-1m.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "./output";
pub const DEFAULT_LOG_FILE: &str = "./output/app.log";

// Paths relative to the output directory
/// Per-worker result CSV files, named `<start>.csv`
pub const WORKER_CSV_DIR: &str = "worker_csv";
/// Per-worker error logs, named `<start>.log`
pub const WORKER_LOG_DIR: &str = "worker_log";
/// Runtime log shared by all workers
pub const WORKERS_RUNTIME_LOG_FILE: &str = "workers.log";
