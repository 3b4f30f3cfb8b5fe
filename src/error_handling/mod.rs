//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions (transport, classifier, input, initialization)
//! - Categorization of caught fetch errors
//! - Per-batch error statistics

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_fetch_error, categorize_reqwest_error};
pub use stats::ProcessingStats;
pub use types::{ClassifierError, ErrorType, FetchError, InitializationError, InputError};
