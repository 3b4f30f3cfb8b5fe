//! Favicon inspection strategies.
//!
//! Both strategies share the `Inspector` contract: load something for a
//! domain, then report the favicon URL found in it (empty when none). The
//! resolver tries them in a fixed order.

mod headers;
mod html;

use async_trait::async_trait;

use crate::error_handling::FetchError;

pub use headers::HeaderInspector;
pub use html::{extract_icon_link_href, format_favicon_link_href_to_url, HtmlInspector};

/// A way of finding a domain's favicon.
#[async_trait]
pub trait Inspector: Send + Sync {
    /// Short strategy name used in log lines.
    fn name(&self) -> &'static str;

    /// Fetches whatever the strategy inspects for `domain` (e.g. `yahoo.com`).
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` when the transport produced no response.
    async fn load_by_domain(&mut self, domain: &str) -> Result<(), FetchError>;

    /// Favicon URL found in the loaded content, or an empty string.
    async fn find_favicon(&self) -> String;
}
