//! Header-based favicon inspection.
//!
//! Probes `<scheme>://<domain>/favicon.ico` and classifies the response from
//! its headers alone. A redirecting probe is chased through a bounded number
//! of `Location` hops, each fetched independently.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::config::{ResolverConfig, FAVICON_PATH};
use crate::error_handling::FetchError;
use crate::fetch::{fetch_header_chain, HttpResponseRecord};
use crate::inspector::Inspector;

/// Finds a favicon at the conventional `/favicon.ico` location.
pub struct HeaderInspector {
    client: Arc<reqwest::Client>,
    config: Arc<ResolverConfig>,
    response: HttpResponseRecord,
}

impl HeaderInspector {
    /// Creates an inspector using a client built from `FetchOptions::header_probe`.
    pub fn new(client: Arc<reqwest::Client>, config: Arc<ResolverConfig>) -> Self {
        Self {
            client,
            config,
            response: HttpResponseRecord::new(),
        }
    }

    /// Default favicon URL of a domain.
    pub fn default_favicon_url(&self, domain: &str) -> String {
        format!("{}://{}{}", self.config.scheme, domain, FAVICON_PATH)
    }

    /// Fetches the headers of `url`, replacing any previously loaded response.
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` if the transport produced no response.
    pub async fn load_by_url(&mut self, url: &str) -> Result<(), FetchError> {
        self.response = HttpResponseRecord::new();
        let header_sets =
            fetch_header_chain(&self.client, url, self.config.max_transport_hops).await?;
        self.response.populate(header_sets, url);
        Ok(())
    }

    /// Response captured by the last `load_*` call.
    pub fn response(&self) -> &HttpResponseRecord {
        &self.response
    }

    /// Follows the `Location` of the loaded response.
    ///
    /// Succeeds only when a target answers without a `Location` of its own and
    /// is classified as a favicon. Gives up on an empty target, a failed fetch,
    /// or once `max_location_redirects` responses (the loaded one included)
    /// have been seen, so cyclic chains terminate.
    pub async fn follow_location_redirects(&self) -> Option<String> {
        let mut location = first_location(&self.response);

        for hop in 1..self.config.max_location_redirects {
            // Site-wide redirect without a usable target (e.g. qq.com?fromdefault)
            let target = location.filter(|target| !target.is_empty())?;

            let mut inspector = HeaderInspector::new(self.client.clone(), self.config.clone());
            if let Err(e) = inspector.load_by_url(&target).await {
                debug!("Redirect hop {} to {} failed: {}", hop, target, e);
                return None;
            }

            let response = inspector.response;
            if response.location().is_none() && matches!(response.is_favicon(), Ok(true)) {
                debug!("Redirect hop {} confirmed favicon at {}", hop, target);
                return Some(target);
            }

            location = first_location(&response);
        }

        debug!(
            "No favicon after {} redirect hops from {}",
            self.config.max_location_redirects,
            self.response.url().unwrap_or_default()
        );
        None
    }
}

/// First `Location` value of the first hop.
fn first_location(response: &HttpResponseRecord) -> Option<String> {
    response
        .location()
        .and_then(|values| values.first())
        .cloned()
}

#[async_trait]
impl Inspector for HeaderInspector {
    fn name(&self) -> &'static str {
        "headers"
    }

    async fn load_by_domain(&mut self, domain: &str) -> Result<(), FetchError> {
        let url = self.default_favicon_url(domain);
        self.load_by_url(&url).await
    }

    async fn find_favicon(&self) -> String {
        if self.response.is_empty() {
            return String::new();
        }

        match self.response.is_favicon() {
            Ok(true) => return self.response.url().unwrap_or_default().to_string(),
            Ok(false) => {}
            Err(e) => {
                debug!("Cannot classify response: {}", e);
                return String::new();
            }
        }

        if self.response.location().is_some() {
            return self.follow_location_redirects().await.unwrap_or_default();
        }

        String::new()
    }
}
