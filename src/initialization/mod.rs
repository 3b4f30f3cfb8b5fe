//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - HTTP clients built from explicit per-strategy fetch options
//! - The logger

mod client;
mod logger;

// Re-export public API
pub use client::{build_client, FetchOptions, RedirectMode};
pub use logger::init_logger_with;
