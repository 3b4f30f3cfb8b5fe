//! HTTP fetches used by the inspectors.
//!
//! - `fetch_header_chain` walks a redirect chain manually and keeps the status
//!   line and headers of every hop, never reading a body.
//! - `fetch_document` downloads a page (redirects followed by the client) and
//!   records where it ended up.

use log::debug;
use reqwest::header::CONNECTION;
use reqwest::Url;

use crate::error_handling::FetchError;
use crate::fetch::response::HeaderSet;

/// A downloaded HTML page.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// URL after all redirects
    pub final_url: String,
    /// Lower-cased scheme of `final_url`
    pub scheme: String,
    /// Body decoded as UTF-8 (lossy), truncated at the size cap
    pub body: String,
}

fn parse_url(url: &str) -> Result<Url, FetchError> {
    Url::parse(url).map_err(|source| FetchError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

fn is_redirect_status(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308)
}

/// Resolves the `Location` of a redirect response against the URL that produced it.
fn redirect_target(response: &reqwest::Response, current: &Url) -> Option<Url> {
    if !is_redirect_status(response.status()) {
        return None;
    }
    let location = response.headers().get(reqwest::header::LOCATION)?;
    let location = String::from_utf8_lossy(location.as_bytes());
    match current.join(location.trim()) {
        Ok(next) => Some(next),
        Err(e) => {
            debug!("Unusable Location '{}' from {}: {}", location, current, e);
            None
        }
    }
}

/// Fetches the headers of `url`, following redirects hop by hop.
///
/// Every response contributes one `HeaderSet`, the first request's response
/// first. Bodies are never read; each request is sent with `Connection: close`.
///
/// # Errors
///
/// - `FetchError::InvalidUrl` if `url` is not an absolute URL
/// - `FetchError::Request` on DNS, connect, TLS, or timeout failures
/// - `FetchError::TooManyRedirects` if more than `max_redirects` redirects
///   would have to be followed
pub async fn fetch_header_chain(
    client: &reqwest::Client,
    url: &str,
    max_redirects: usize,
) -> Result<Vec<HeaderSet>, FetchError> {
    let mut header_sets = Vec::new();
    let mut current = parse_url(url)?;

    loop {
        let response = client
            .get(current.clone())
            .header(CONNECTION, "close")
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: current.to_string(),
                source,
            })?;

        header_sets.push(HeaderSet::from_response(&response));
        let next = redirect_target(&response, &current);
        drop(response);

        match next {
            Some(next) => {
                if header_sets.len() > max_redirects {
                    return Err(FetchError::TooManyRedirects {
                        url: url.to_string(),
                        limit: max_redirects,
                    });
                }
                debug!("Header fetch redirected {} -> {}", current, next);
                current = next;
            }
            None => return Ok(header_sets),
        }
    }
}

/// Downloads a page, keeping at most `max_body_size` bytes of it.
///
/// The response status is not checked; error pages are returned like any
/// other document.
///
/// # Errors
///
/// - `FetchError::InvalidUrl` if `url` is not an absolute URL
/// - `FetchError::Request` on transport failures, including exceeding the
///   client's redirect limit
/// - `FetchError::Body` if the body stream fails before the cap is reached
pub async fn fetch_document(
    client: &reqwest::Client,
    url: &str,
    max_body_size: usize,
) -> Result<FetchedDocument, FetchError> {
    let request_url = parse_url(url)?;
    let mut response = client
        .get(request_url)
        .send()
        .await
        .map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

    let final_url = response.url().clone();
    let mut body: Vec<u8> = Vec::with_capacity(max_body_size.min(64 * 1024));

    while let Some(chunk) = response.chunk().await.map_err(|source| FetchError::Body {
        url: final_url.to_string(),
        source,
    })? {
        let remaining = max_body_size - body.len();
        if chunk.len() >= remaining {
            body.extend_from_slice(&chunk[..remaining]);
            debug!(
                "Body of {} exceeds {}KB, ignoring the rest",
                final_url,
                max_body_size / 1024
            );
            break;
        }
        body.extend_from_slice(&chunk);
    }

    Ok(FetchedDocument {
        final_url: final_url.to_string(),
        scheme: final_url.scheme().to_ascii_lowercase(),
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}
