//! Error type definitions.
//!
//! This module defines all error types used throughout the application and the
//! `ErrorType` categories used for batch statistics.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing an HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Transport failure while fetching headers or HTML.
///
/// Returned by inspector `load_*` calls. The resolver logs it and moves on to
/// the next strategy; it is never retried.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL could not be parsed (e.g. a relative `Location` target).
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// DNS, connect, TLS, timeout, or protocol failure.
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: ReqwestError,
    },

    /// The response body could not be read to completion.
    #[error("Reading body from {url} failed: {source}")]
    Body {
        url: String,
        #[source]
        source: ReqwestError,
    },

    /// The redirect chain of a single fetch exceeded its hop limit.
    #[error("Redirection limit of {limit} reached for {url}")]
    TooManyRedirects { url: String, limit: usize },
}

impl FetchError {
    /// URL of the request that failed.
    pub fn url(&self) -> &str {
        match self {
            FetchError::InvalidUrl { url, .. }
            | FetchError::Request { url, .. }
            | FetchError::Body { url, .. }
            | FetchError::TooManyRedirects { url, .. } => url,
        }
    }
}

/// Misuse of the response classifier.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ClassifierError {
    /// `is_favicon` was called before any headers were populated.
    #[error("No response found. Populate the response before classifying it")]
    NotPopulated,
}

/// Invalid domain source input.
#[derive(Error, Debug)]
pub enum InputError {
    /// Range bounds must both be 1 or greater.
    #[error("start and offset must be 1 or greater (got start={start}, offset={offset})")]
    InvalidRange { start: usize, offset: usize },

    /// Launcher group numbers start at 1.
    #[error("group must be 1 or greater (got {0})")]
    InvalidGroup(usize),

    /// The CSV file could not be opened.
    #[error("CSV file could not be loaded from {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A record could not be read from the CSV file.
    #[error("CSV read error: {0}")]
    Read(#[from] csv::Error),
}

/// Categories of caught fetch errors.
///
/// Batch runs count caught errors per category; the counts are logged when the
/// batch completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    FetchTimeoutError,
    FetchConnectError,
    FetchRedirectError,
    FetchInvalidUrlError,
    FetchBodyError,
    FetchOtherError,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::FetchTimeoutError => "Fetch timeout",
            ErrorType::FetchConnectError => "Fetch connect error",
            ErrorType::FetchRedirectError => "Fetch redirect error",
            ErrorType::FetchInvalidUrlError => "Invalid URL",
            ErrorType::FetchBodyError => "Body read error",
            ErrorType::FetchOtherError => "Fetch error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_error_type_strings_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for error_type in ErrorType::iter() {
            assert!(seen.insert(error_type.as_str()));
        }
    }

    #[test]
    fn test_invalid_range_message() {
        let err = InputError::InvalidRange {
            start: 0,
            offset: 10,
        };
        assert_eq!(
            err.to_string(),
            "start and offset must be 1 or greater (got start=0, offset=10)"
        );
    }

    #[test]
    fn test_too_many_redirects_message_and_url() {
        let err = FetchError::TooManyRedirects {
            url: "https://loop.example/favicon.ico".to_string(),
            limit: 20,
        };
        assert_eq!(err.url(), "https://loop.example/favicon.ico");
        assert!(err.to_string().contains("Redirection limit of 20"));
    }

    #[test]
    fn test_invalid_url_keeps_target() {
        let source = url::Url::parse("/relative/favicon.ico").unwrap_err();
        let err = FetchError::InvalidUrl {
            url: "/relative/favicon.ico".to_string(),
            source,
        };
        assert_eq!(err.url(), "/relative/favicon.ico");
        assert!(err.to_string().starts_with("Invalid URL '/relative/favicon.ico'"));
    }
}
