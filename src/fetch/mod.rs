//! HTTP fetching and response classification.

mod request;
mod response;

pub use request::{fetch_document, fetch_header_chain, FetchedDocument};
pub use response::{HeaderSet, HttpResponseRecord, ResponseStatus};
