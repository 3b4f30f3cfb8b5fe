//! Error categorization.

use super::types::{ErrorType, FetchError};

/// Categorizes a `reqwest::Error` into an `ErrorType`.
///
/// Timeouts are checked first because a connect timeout reports both
/// `is_timeout()` and `is_connect()`.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ErrorType {
    if error.is_timeout() {
        ErrorType::FetchTimeoutError
    } else if error.is_connect() {
        ErrorType::FetchConnectError
    } else if error.is_redirect() {
        ErrorType::FetchRedirectError
    } else if error.is_builder() {
        ErrorType::FetchInvalidUrlError
    } else if error.is_body() || error.is_decode() {
        ErrorType::FetchBodyError
    } else {
        ErrorType::FetchOtherError
    }
}

/// Categorizes a caught `FetchError`.
pub fn categorize_fetch_error(error: &FetchError) -> ErrorType {
    match error {
        FetchError::InvalidUrl { .. } => ErrorType::FetchInvalidUrlError,
        FetchError::TooManyRedirects { .. } => ErrorType::FetchRedirectError,
        FetchError::Request { source, .. } => categorize_reqwest_error(source),
        FetchError::Body { source, .. } => match categorize_reqwest_error(source) {
            ErrorType::FetchTimeoutError => ErrorType::FetchTimeoutError,
            _ => ErrorType::FetchBodyError,
        },
    }
}
