//! HTML-based favicon inspection.
//!
//! Downloads a domain's homepage and looks for the first
//! `<link rel="icon">` or `<link rel="shortcut icon">` tag. Markup in the
//! wild is often malformed, so tags are located with a lenient regex and each
//! one is parsed on its own as an HTML fragment.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use log::debug;
use regex::Regex;
use scraper::{Html, Selector};

use crate::config::{ResolverConfig, MAX_HTML_BODY_SIZE};
use crate::error_handling::FetchError;
use crate::fetch::fetch_document;
use crate::inspector::Inspector;

const LINK_SELECTOR_STR: &str = "link";

/// `rel` values that declare a favicon, compared as authored.
const FAVICON_RELS: &[&str] = &["shortcut icon", "icon"];

// `<link ...>` in any case, spanning lines, attribute order and quoting irrelevant
static LINK_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?si)<link (.*?)>").expect("Failed to compile link tag regex - this is a bug")
});

static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(LINK_SELECTOR_STR).expect("Failed to parse link selector - this is a bug")
});

/// Finds a favicon declared in a domain's homepage.
pub struct HtmlInspector {
    client: Arc<reqwest::Client>,
    config: Arc<ResolverConfig>,
    html_content: Option<String>,
    url: Option<String>,
    scheme: Option<String>,
}

impl HtmlInspector {
    /// Creates an inspector using a client built from `FetchOptions::html_document`.
    pub fn new(client: Arc<reqwest::Client>, config: Arc<ResolverConfig>) -> Self {
        Self {
            client,
            config,
            html_content: None,
            url: None,
            scheme: None,
        }
    }

    /// Homepage HTML from the last load.
    pub fn html_content(&self) -> Option<&str> {
        self.html_content.as_deref()
    }

    /// URL the homepage was finally served from.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Lower-cased scheme (`http`/`https`) of the final URL.
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// Resolves a favicon `href` against the loaded page.
    pub fn format_favicon_link_href_to_url(&self, href: &str) -> String {
        format_favicon_link_href_to_url(href, self.url(), self.scheme())
    }
}

#[async_trait]
impl Inspector for HtmlInspector {
    fn name(&self) -> &'static str {
        "html"
    }

    async fn load_by_domain(&mut self, domain: &str) -> Result<(), FetchError> {
        let url = format!("{}://{}", self.config.scheme, domain);
        let document = fetch_document(&self.client, &url, MAX_HTML_BODY_SIZE).await?;
        debug!(
            "Loaded {} bytes of HTML for {} from {}",
            document.body.len(),
            domain,
            document.final_url
        );

        self.url = Some(document.final_url);
        self.scheme = Some(document.scheme);
        self.html_content = Some(document.body);
        Ok(())
    }

    async fn find_favicon(&self) -> String {
        let Some(html) = self.html_content().filter(|html| !html.is_empty()) else {
            return String::new();
        };

        match extract_icon_link_href(html) {
            Some(href) => self.format_favicon_link_href_to_url(&href),
            None => String::new(),
        }
    }
}

/// `href` of the first icon `<link>` tag, as authored.
///
/// A matching tag without `href` yields `Some("")`.
pub fn extract_icon_link_href(html: &str) -> Option<String> {
    for tag in LINK_TAG_RE.find_iter(html) {
        let fragment = Html::parse_fragment(tag.as_str());
        let Some(link) = fragment.select(&LINK_SELECTOR).next() else {
            continue;
        };

        let rel = link.value().attr("rel").unwrap_or_default();
        if FAVICON_RELS.contains(&rel) {
            return Some(link.value().attr("href").unwrap_or_default().to_string());
        }
    }
    None
}

/// Turns a favicon `href` into a usable URL.
///
/// `page_url` and `scheme` describe where the HTML was served from.
///
/// - empty or inline `data:image` hrefs are unsupported (empty result)
/// - the href is trimmed and lower-cased; absolute `http(s)` hrefs are returned as is
/// - without a known page host and scheme the href is returned unchanged
/// - `//cdn/x.ico` takes the page scheme
/// - `/x.ico` is rooted at the page host. A non-default port of the page URL
///   is kept (`http://127.0.0.1:8080/x.ico`), where a plain
///   `{scheme}://{host}{href}` join would drop it
/// - anything else is appended to the page URL cut after the first `/`
///   following the host
pub fn format_favicon_link_href_to_url(
    href: &str,
    page_url: Option<&str>,
    scheme: Option<&str>,
) -> String {
    if href.is_empty() || href.starts_with("data:image") {
        return String::new();
    }

    let href = href.trim().to_lowercase();

    if href.starts_with("http") {
        return href;
    }

    let parsed = page_url.and_then(|url| url::Url::parse(url).ok());
    let host = parsed
        .as_ref()
        .and_then(|url| url.host_str())
        .filter(|host| !host.is_empty());
    let (Some(page_url), Some(parsed), Some(host), Some(scheme)) = (
        page_url,
        parsed.as_ref(),
        host,
        scheme.filter(|scheme| !scheme.is_empty()),
    ) else {
        return href;
    };

    if href.starts_with("//") {
        return format!("{scheme}:{href}");
    }

    if href.starts_with('/') {
        // i.e. domain=savefrom.net, page=https://en.savefrom.net/8/ -> https://en.savefrom.net/favicon.ico
        return match parsed.port() {
            Some(port) => format!("{scheme}://{host}:{port}{href}"),
            None => format!("{scheme}://{host}{href}"),
        };
    }

    format!("{}{}", url_root(page_url), href)
}

/// Page URL up to and including the first `/` after the host.
fn url_root(page_url: &str) -> String {
    let authority_start = page_url.find("://").map_or(0, |i| i + 3);
    match page_url[authority_start..].find('/') {
        Some(i) => page_url[..authority_start + i + 1].to_string(),
        None => format!("{page_url}/"),
    }
}
