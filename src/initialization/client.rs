//! HTTP client initialization.
//!
//! Each inspection strategy describes its transport with a `FetchOptions`
//! value and gets a dedicated `reqwest::Client` built from it.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::ResolverConfig;
use crate::error_handling::InitializationError;

/// Redirect handling for a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    /// Return 3xx responses to the caller
    Manual,
    /// Follow up to N redirects automatically
    Follow(usize),
}

/// Transport settings for one kind of fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Total request timeout
    pub timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Redirect handling
    pub redirect: RedirectMode,
    /// User-Agent header, or reqwest's default when `None`
    pub user_agent: Option<String>,
    /// Skip certificate and hostname verification
    pub accept_invalid_certs: bool,
    /// Send `Connection: close` and keep no idle connections
    pub connection_close: bool,
}

impl FetchOptions {
    /// Header probe: no automatic redirects, connection closed after each request.
    pub fn header_probe(config: &ResolverConfig) -> Self {
        Self {
            timeout: config.probe_timeout,
            connect_timeout: config.probe_timeout,
            redirect: RedirectMode::Manual,
            user_agent: None,
            accept_invalid_certs: true,
            connection_close: true,
        }
    }

    /// Homepage fetch: follows redirects and identifies as a desktop browser.
    pub fn html_document(config: &ResolverConfig) -> Self {
        Self {
            timeout: config.html_timeout,
            connect_timeout: config.html_connect_timeout,
            redirect: RedirectMode::Follow(config.max_html_redirects),
            user_agent: Some(config.user_agent.clone()),
            accept_invalid_certs: true,
            connection_close: false,
        }
    }
}

/// Builds a `reqwest::Client` from fetch options.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if the TLS backend cannot be
/// initialized.
pub fn build_client(options: &FetchOptions) -> Result<Arc<reqwest::Client>, InitializationError> {
    let redirect_policy = match options.redirect {
        RedirectMode::Manual => reqwest::redirect::Policy::none(),
        RedirectMode::Follow(max) => reqwest::redirect::Policy::limited(max),
    };

    let mut builder = ClientBuilder::new()
        .redirect(redirect_policy)
        .timeout(options.timeout)
        .connect_timeout(options.connect_timeout)
        .danger_accept_invalid_certs(options.accept_invalid_certs);

    if let Some(user_agent) = &options.user_agent {
        builder = builder.user_agent(user_agent.clone());
    }
    if options.connection_close {
        builder = builder.pool_max_idle_per_host(0);
    }

    Ok(Arc::new(builder.build()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_probe_options() {
        let options = FetchOptions::header_probe(&ResolverConfig::default());
        assert_eq!(options.redirect, RedirectMode::Manual);
        assert_eq!(options.timeout, Duration::from_secs(2));
        assert!(options.accept_invalid_certs);
        assert!(options.connection_close);
        assert!(options.user_agent.is_none());
    }

    #[test]
    fn test_html_document_options() {
        let options = FetchOptions::html_document(&ResolverConfig::default());
        assert_eq!(options.redirect, RedirectMode::Follow(3));
        assert_eq!(options.connect_timeout, Duration::from_secs(2));
        assert_eq!(options.timeout, Duration::from_secs(2));
        assert!(options.accept_invalid_certs);
        assert!(options
            .user_agent
            .as_deref()
            .is_some_and(|ua| ua.starts_with("Mozilla/5.0 (Macintosh")));
    }

    #[test]
    fn test_build_client_for_both_strategies() {
        let config = ResolverConfig::default();
        assert!(build_client(&FetchOptions::header_probe(&config)).is_ok());
        assert!(build_client(&FetchOptions::html_document(&config)).is_ok());
    }
}
