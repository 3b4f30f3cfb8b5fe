//! Response header capture and favicon classification.
//!
//! A header fetch produces one `HeaderSet` per hop of its redirect chain. The
//! `HttpResponseRecord` built from those sets decides whether the fetched URL
//! is a favicon, looking only at the first hop's status line and headers.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use hyper::ext::ReasonPhrase;
use regex::Regex;

use crate::config::FAVICON_CONTENT_TYPES;
use crate::error_handling::ClassifierError;

const HEADER_LOCATION: &str = "location";
const HEADER_CONTENT_TYPE: &str = "content-type";
const HEADER_CONTENT_LENGTH: &str = "content-length";

// Protocol prefix varies (HTTP/1.0, HTTP/1.1, HTTP/2.0), so match the code and reason only
static STATUS_OK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)200 OK").expect("Failed to compile 200 OK regex - this is a bug"));

static STATUS_NOT_FOUND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)404 Not Found").expect("Failed to compile 404 regex - this is a bug")
});

/// Classification of the first response's status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    /// Status line contains `200 OK`
    Ok,
    /// Status line contains `404 Not Found`
    NotFound,
    /// Anything else, including a missing status line
    Other,
}

impl ResponseStatus {
    /// Classifies a raw status line such as `HTTP/1.1 200 OK`.
    pub fn from_status_line(status_line: &str) -> Self {
        if STATUS_OK_RE.is_match(status_line) {
            ResponseStatus::Ok
        } else if STATUS_NOT_FOUND_RE.is_match(status_line) {
            ResponseStatus::NotFound
        } else {
            ResponseStatus::Other
        }
    }
}

/// Status line and headers of one response in a redirect chain.
///
/// Header names are stored lower-cased. A header sent more than once keeps all
/// of its values in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    status_line: String,
    headers: BTreeMap<String, Vec<String>>,
}

impl HeaderSet {
    pub fn new(status_line: impl Into<String>) -> Self {
        Self {
            status_line: status_line.into(),
            headers: BTreeMap::new(),
        }
    }

    /// Adds a header value, appending to any values already present for `name`.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.headers
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.into());
    }

    /// Captures the status line and headers of a `reqwest::Response`.
    ///
    /// The status line is rendered as `<version> <code> <reason>`, e.g.
    /// `HTTP/1.1 200 OK`. The reason is the one the server sent; hyper only
    /// keeps it when it differs from the canonical phrase.
    pub fn from_response(response: &reqwest::Response) -> Self {
        let mut set = HeaderSet::new(status_line_of(response));
        for (name, value) in response.headers() {
            set.insert(
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            );
        }
        set
    }

    pub fn status_line(&self) -> &str {
        &self.status_line
    }

    /// All values of a header (case-insensitive name).
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
    }

    /// First value of a header (case-insensitive name).
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|values| values.first()).map(String::as_str)
    }

    pub fn headers(&self) -> &BTreeMap<String, Vec<String>> {
        &self.headers
    }
}

fn status_line_of(response: &reqwest::Response) -> String {
    let version = response.version();
    let status = response.status();

    let reason = match response.extensions().get::<ReasonPhrase>() {
        Some(sent) => Some(String::from_utf8_lossy(sent.as_bytes()).into_owned()),
        None => status.canonical_reason().map(str::to_string),
    };

    match reason {
        Some(reason) => format!("{:?} {} {}", version, status.as_str(), reason),
        None => format!("{:?} {}", version, status.as_str()),
    }
}

/// Headers captured for one fetched URL.
///
/// Built fresh for every fetch attempt and never mutated afterwards. The
/// derived accessors (`location`, `content_type`, `content_length`) read the
/// first header set only.
#[derive(Debug, Clone, Default)]
pub struct HttpResponseRecord {
    url: Option<String>,
    header_sets: Vec<HeaderSet>,
    populated: bool,
}

impl HttpResponseRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record already populated with `header_sets`.
    pub fn from_header_sets(header_sets: Vec<HeaderSet>, url: impl Into<String>) -> Self {
        let mut record = Self::new();
        record.populate(header_sets, url);
        record
    }

    /// Stores the header sets of a fetch (hop 0 first) and the URL they belong to.
    ///
    /// Header values are not validated; absent headers simply resolve to `None`.
    pub fn populate(&mut self, header_sets: Vec<HeaderSet>, url: impl Into<String>) {
        self.url = Some(url.into());
        self.header_sets = header_sets;
        self.populated = true;
    }

    /// `true` when no header set has been recorded.
    pub fn is_empty(&self) -> bool {
        self.header_sets.is_empty()
    }

    /// URL the headers were fetched from.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn header_sets(&self) -> &[HeaderSet] {
        &self.header_sets
    }

    /// `Location` values of the first response.
    pub fn location(&self) -> Option<&[String]> {
        self.header_sets.first()?.get(HEADER_LOCATION)
    }

    /// `Content-Type` of the first response.
    pub fn content_type(&self) -> Option<&str> {
        self.header_sets.first()?.first(HEADER_CONTENT_TYPE)
    }

    /// `Content-Length` of the first response, unparsed.
    pub fn content_length(&self) -> Option<&str> {
        self.header_sets.first()?.first(HEADER_CONTENT_LENGTH)
    }

    /// Classifies the first response's status line.
    pub fn first_response_status(&self) -> ResponseStatus {
        self.header_sets
            .first()
            .map(|set| ResponseStatus::from_status_line(set.status_line()))
            .unwrap_or(ResponseStatus::Other)
    }

    /// Content types accepted as a favicon without sniffing.
    pub fn favicon_content_types() -> &'static [&'static str] {
        FAVICON_CONTENT_TYPES
    }

    /// Decides whether the fetched URL served a favicon.
    ///
    /// Rules, in order:
    /// 1. More than one header set: the fetch went through redirects, so the
    ///    answer is left to the caller's redirect handling (`false`).
    /// 2. `Content-Length: 0` is a known false positive (`false`).
    /// 3. The first status must be `200 OK` and the content type must be in
    ///    the allow-list or contain `image` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::NotPopulated` if called before `populate`.
    pub fn is_favicon(&self) -> Result<bool, ClassifierError> {
        if !self.populated {
            return Err(ClassifierError::NotPopulated);
        }

        // Ambiguous multi-hop capture; may drop a few real favicons
        if self.header_sets.len() > 1 {
            return Ok(false);
        }

        if self.content_length() == Some("0") {
            return Ok(false);
        }

        if self.first_response_status() != ResponseStatus::Ok {
            return Ok(false);
        }

        Ok(self.content_type().is_some_and(|content_type| {
            Self::favicon_content_types().contains(&content_type)
                || content_type.to_ascii_lowercase().contains("image")
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_icon() -> HeaderSet {
        HeaderSet::new("HTTP/1.1 200 OK")
            .with_header("Content-Type", "image/x-icon")
            .with_header("Content-Length", "1150")
    }

    #[test]
    fn test_status_line_classification() {
        assert_eq!(
            ResponseStatus::from_status_line("HTTP/1.1 200 OK"),
            ResponseStatus::Ok
        );
        assert_eq!(
            ResponseStatus::from_status_line("HTTP/1.0 200 ok"),
            ResponseStatus::Ok
        );
        assert_eq!(
            ResponseStatus::from_status_line("HTTP/2.0 404 Not Found"),
            ResponseStatus::NotFound
        );
        assert_eq!(
            ResponseStatus::from_status_line("HTTP/1.1 404 NOT FOUND"),
            ResponseStatus::NotFound
        );
        assert_eq!(
            ResponseStatus::from_status_line("HTTP/1.1 301 Moved Permanently"),
            ResponseStatus::Other
        );
        assert_eq!(
            ResponseStatus::from_status_line("HTTP/1.1 200 Fine"),
            ResponseStatus::Other
        );
        assert_eq!(ResponseStatus::from_status_line(""), ResponseStatus::Other);
    }

    #[test]
    fn test_header_names_are_case_insensitive() {
        let set = HeaderSet::new("HTTP/1.1 301 Moved Permanently")
            .with_header("LOCATION", "https://www.example.com/favicon.ico");
        assert_eq!(
            set.first("location"),
            Some("https://www.example.com/favicon.ico")
        );
        assert_eq!(
            set.first("Location"),
            Some("https://www.example.com/favicon.ico")
        );
        assert!(set.headers().contains_key("location"));
    }

    #[test]
    fn test_repeated_headers_keep_all_values() {
        let set = HeaderSet::new("HTTP/1.1 302 Found")
            .with_header("Location", "https://a.example/favicon.ico")
            .with_header("location", "https://b.example/favicon.ico");
        assert_eq!(
            set.get("location"),
            Some(
                &[
                    "https://a.example/favicon.ico".to_string(),
                    "https://b.example/favicon.ico".to_string()
                ][..]
            )
        );
    }

    #[test]
    fn test_unpopulated_record_errors() {
        let record = HttpResponseRecord::new();
        assert!(record.is_empty());
        assert_eq!(record.is_favicon(), Err(ClassifierError::NotPopulated));
        assert_eq!(record.first_response_status(), ResponseStatus::Other);
        assert!(record.location().is_none());
    }

    #[test]
    fn test_populated_empty_record_is_not_favicon() {
        let record = HttpResponseRecord::from_header_sets(Vec::new(), "https://example.com/favicon.ico");
        assert!(record.is_empty());
        assert_eq!(record.is_favicon(), Ok(false));
    }

    #[test]
    fn test_plain_icon_is_favicon() {
        let record =
            HttpResponseRecord::from_header_sets(vec![ok_icon()], "https://example.com/favicon.ico");
        assert!(!record.is_empty());
        assert_eq!(record.url(), Some("https://example.com/favicon.ico"));
        assert_eq!(record.first_response_status(), ResponseStatus::Ok);
        assert_eq!(record.content_type(), Some("image/x-icon"));
        assert_eq!(record.content_length(), Some("1150"));
        assert_eq!(record.is_favicon(), Ok(true));
    }

    #[test]
    fn test_allow_listed_content_types() {
        for content_type in HttpResponseRecord::favicon_content_types() {
            let set = HeaderSet::new("HTTP/1.1 200 OK").with_header("content-type", *content_type);
            let record = HttpResponseRecord::from_header_sets(vec![set], "https://x.example/favicon.ico");
            assert_eq!(record.is_favicon(), Ok(true), "{content_type}");
        }
    }

    #[test]
    fn test_nonstandard_image_content_type() {
        let set = HeaderSet::new("HTTP/1.1 200 OK").with_header("Content-Type", "IMAGE/GIF; charset=binary");
        let record = HttpResponseRecord::from_header_sets(vec![set], "https://x.example/favicon.ico");
        assert_eq!(record.is_favicon(), Ok(true));
    }

    #[test]
    fn test_html_content_type_is_not_favicon() {
        let set = HeaderSet::new("HTTP/1.1 200 OK").with_header("Content-Type", "text/html; charset=utf-8");
        let record = HttpResponseRecord::from_header_sets(vec![set], "https://x.example/favicon.ico");
        assert_eq!(record.is_favicon(), Ok(false));
    }

    #[test]
    fn test_missing_content_type_is_not_favicon() {
        let set = HeaderSet::new("HTTP/1.1 200 OK").with_header("Content-Length", "318");
        let record = HttpResponseRecord::from_header_sets(vec![set], "https://x.example/favicon.ico");
        assert_eq!(record.is_favicon(), Ok(false));
    }

    #[test]
    fn test_zero_content_length_is_never_favicon() {
        for status in ["HTTP/1.1 200 OK", "HTTP/1.1 404 Not Found", "HTTP/1.1 500 Internal Server Error"] {
            for content_type in ["image/x-icon", "image/png", "application/octet-stream"] {
                let set = HeaderSet::new(status)
                    .with_header("Content-Type", content_type)
                    .with_header("Content-Length", "0");
                let record =
                    HttpResponseRecord::from_header_sets(vec![set], "https://x.example/favicon.ico");
                assert_eq!(record.is_favicon(), Ok(false), "{status} {content_type}");
            }
        }
    }

    #[test]
    fn test_multiple_hops_are_never_favicon() {
        // Hop 0 alone would be a perfect match
        let record = HttpResponseRecord::from_header_sets(
            vec![ok_icon(), ok_icon()],
            "https://x.example/favicon.ico",
        );
        assert_eq!(record.first_response_status(), ResponseStatus::Ok);
        assert_eq!(record.is_favicon(), Ok(false));
    }

    #[test]
    fn test_not_found_image_is_not_favicon() {
        let set = HeaderSet::new("HTTP/1.1 404 Not Found").with_header("Content-Type", "image/png");
        let record = HttpResponseRecord::from_header_sets(vec![set], "https://x.example/favicon.ico");
        assert_eq!(record.first_response_status(), ResponseStatus::NotFound);
        assert_eq!(record.is_favicon(), Ok(false));
    }

    #[test]
    fn test_derived_headers_come_from_first_hop() {
        let first = HeaderSet::new("HTTP/1.1 301 Moved Permanently")
            .with_header("Location", "https://www.example.com/favicon.ico");
        let second = ok_icon();
        let record =
            HttpResponseRecord::from_header_sets(vec![first, second], "https://example.com/favicon.ico");
        assert_eq!(
            record.location(),
            Some(&["https://www.example.com/favicon.ico".to_string()][..])
        );
        assert_eq!(record.content_type(), None);
        assert_eq!(record.content_length(), None);
        assert_eq!(record.first_response_status(), ResponseStatus::Other);
    }
}
