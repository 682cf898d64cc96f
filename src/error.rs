// src/error.rs
// =============================================================================
// Error types for the crawl engine.
//
// There are two very different kinds of failure:
//
// - FetchError: one page could not be fetched. This is recorded on that
//   page's record and the crawl carries on. It is data, not control flow.
// - CrawlError: the crawl could not start at all (robots.txt says no, the
//   start URL is unusable, the HTTP client could not be built). No page is
//   fetched when one of these happens.
//
// Malformed HTML is not an error anywhere: the extractor just returns
// empty fields.
// =============================================================================

use thiserror::Error;

/// Longest error description stored on a page record
pub const MAX_ERROR_LEN: usize = 100;

/// Why a single page fetch failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request did not finish within the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// DNS failure, refused connection, TLS handshake failure, ...
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The server answered with a status outside 2xx/3xx
    #[error("HTTP error {status}")]
    Http { status: u16 },

    /// Anything else reqwest reports (bad body, redirect loop, ...)
    #[error("Request failed: {0}")]
    Other(String),
}

impl FetchError {
    /// Maps a reqwest error onto one of the four categories
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        let message = truncate(&error.to_string(), MAX_ERROR_LEN);

        if error.is_timeout() {
            FetchError::Timeout(message)
        } else if error.is_connect() {
            FetchError::Connection(message)
        } else if let Some(status) = error.status() {
            FetchError::Http {
                status: status.as_u16(),
            }
        } else {
            FetchError::Other(message)
        }
    }

    /// Stable tag for callers that branch on the category
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Timeout(_) => "timeout",
            FetchError::Connection(_) => "connection",
            FetchError::Http { .. } => "http",
            FetchError::Other(_) => "other",
        }
    }

    /// Human-readable description, at most MAX_ERROR_LEN characters
    pub fn describe(&self) -> String {
        truncate(&self.to_string(), MAX_ERROR_LEN)
    }
}

/// Conditions that stop a crawl before any page is fetched
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Crawling is disallowed by {robots_url}")]
    RobotsDisallowed { robots_url: String },

    #[error("Invalid URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("Could not create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Cuts a string down to `max` characters without splitting a character
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}
