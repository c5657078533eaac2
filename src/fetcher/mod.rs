//! Fetcher module for downloading remote blocklists
//!
//! A fetch never returns an error: every way a source can fail is a
//! [`FetchResult`] variant that the reliability state machine consumes.
//!
//! # Components
//!
//! - `Fetch`: the seam the pipeline fetches through
//! - `HttpFetcher`: the `reqwest` implementation
//! - `check_content`: the status and HTML sniffing rules shared by all fetchers
//! - `decode_body`: turns the raw bytes into text for extraction

mod http;

pub use http::{build_http_client, HttpFetcher};

use std::borrow::Cow;
use std::future::Future;

/// Number of leading characters inspected for an HTML marker
pub const HTML_SNIFF_CHARS: usize = 500;

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Successfully fetched a plain-text list
    Success {
        /// HTTP status code
        status_code: u16,
        /// Raw response body, exactly as received
        body: Vec<u8>,
    },

    /// The server answered, but not with a usable list
    ContentRejected {
        /// HTTP status code
        status_code: u16,
        /// Why the response was rejected
        reason: String,
    },

    /// Network error (connection refused, timeout, broken body, ...)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns true if the result carries a usable body
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Short description of a failure for log lines
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::ContentRejected {
                status_code,
                reason,
            } => Some(format!("{} (HTTP {})", reason, status_code)),
            Self::NetworkError { error } => Some(error.clone()),
        }
    }
}

/// Something that can download a source body
pub trait Fetch {
    /// Downloads `url` and classifies the response
    fn fetch(&self, url: &str) -> impl Future<Output = FetchResult> + Send;
}

/// Classifies a received response
///
/// Content success requires status 200 and no `<html>` marker in the first
/// [`HTML_SNIFF_CHARS`] characters of the body, compared case-insensitively.
pub fn check_content(status_code: u16, body: Vec<u8>) -> FetchResult {
    if status_code != 200 {
        return FetchResult::ContentRejected {
            status_code,
            reason: "Unexpected status".to_string(),
        };
    }

    // A char is at most four bytes
    let window = &body[..body.len().min(HTML_SNIFF_CHARS * 4)];
    let head: String = decode_body(window).chars().take(HTML_SNIFF_CHARS).collect();
    if head.to_lowercase().contains("<html>") {
        return FetchResult::ContentRejected {
            status_code,
            reason: "HTML page instead of a list".to_string(),
        };
    }

    FetchResult::Success { status_code, body }
}

/// Decodes a raw body as UTF-8, dropping a leading byte order mark
///
/// Invalid sequences become U+FFFD; the lines they sit on simply fail extraction.
pub fn decode_body(body: &[u8]) -> Cow<'_, str> {
    let body = body.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(body);
    String::from_utf8_lossy(body)
}
