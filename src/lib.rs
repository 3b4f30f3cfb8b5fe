//! favicon_finder library: favicon discovery for ranked domain lists
//!
//! A domain's favicon is found by probing `/favicon.ico` and classifying the
//! response headers, falling back to the `<link rel="icon">` declared in the
//! homepage HTML. Large ranked lists are resolved in sequential batches, each
//! running in its own worker process.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use favicon_finder::output::MemoryLogSink;
//! use favicon_finder::{FaviconResolver, ResolverConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let errors = Arc::new(MemoryLogSink::new());
//! let resolver = FaviconResolver::new(ResolverConfig::default(), errors)?;
//!
//! let favicon = resolver.resolve("yahoo.com").await;
//! println!("Favicon for yahoo.com: {}", favicon);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod config;
pub mod error_handling;
pub mod fetch;
pub mod initialization;
pub mod input;
pub mod inspector;
pub mod launcher;
pub mod output;
pub mod resolver;
pub mod run;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, ResolverConfig};
pub use input::{load_range, DomainEntry};
pub use inspector::{HeaderInspector, HtmlInspector, Inspector};
pub use output::{FaviconRecord, ResultSink};
pub use resolver::{BatchReport, FaviconResolver};
