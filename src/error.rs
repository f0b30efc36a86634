//! Error types for fetching, scraping and parsing.
//!
//! Errors are scoped by how far they are allowed to travel:
//! - [`TransportError`]: a request never produced an HTTP response.
//! - [`ScrapeError`]: a whole source produced nothing usable. The aggregator
//!   turns it into an empty result.
//! - [`ParseError`]: a single listing item was malformed. The item is skipped.

use thiserror::Error;

/// A network-level failure talking to a remote host.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// DNS failure, refused connection, TLS handshake failure and the like.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other failure while sending the request.
    #[error("request failed: {0}")]
    Request(String),

    /// The response arrived but its body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// The HTTP client itself could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl TransportError {
    /// Whether a GET that failed with this error may be attempted again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransportError::Timeout(_)
                | TransportError::Connect(_)
                | TransportError::Request(_)
                | TransportError::Body(_)
        )
    }
}

/// A source-level failure. Never escapes the aggregator.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Markup or script content the source depends on was not found.
    #[error("expected data not found: {0}")]
    DataAbsent(String),

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),
}

/// An item-level failure. The item is dropped and the listing continues.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing {0}")]
    MissingNode(&'static str),

    #[error("unparseable date {0:?}")]
    BadDate(String),
}
