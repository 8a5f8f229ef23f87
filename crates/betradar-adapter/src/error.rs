//! Error taxonomy for the feed client
//!
//! Transport failures are retried inside the fetch primitive and only
//! surface once the retry budget is exhausted. Everything else propagates
//! immediately with its kind intact; construction failures are wrapped in
//! [`FeedError::Initialization`] without discarding the cause.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// Network-level failure (timeout, connect, DNS) after all retries.
    /// HTTP error statuses are not transport failures; they surface as
    /// `Parse` when the body does not decode into the expected shape.
    #[error("request to {url} failed after {attempts} attempt(s): {source}")]
    Transport {
        url: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    /// Base URL override could not be parsed
    #[error("invalid base URL {url:?}: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Expected marker, field or JSON shape absent from a response body
    #[error("unexpected response from {url}: {message}")]
    Parse { url: String, message: String },

    /// Unsupported output format passed to `get_full`
    #[error("invalid output format {0:?}: expected \"csv\" or \"json\"")]
    InvalidFormat(String),

    /// Any failure raised while constructing the client
    #[error("feed initialization failed: {0}")]
    Initialization(#[source] Box<FeedError>),
}

impl FeedError {
    /// Shape-mismatch error for a given endpoint
    pub fn parse(url: impl Into<String>, message: impl Into<String>) -> Self {
        FeedError::Parse { url: url.into(), message: message.into() }
    }

    /// Wrap a construction failure, keeping the cause as `source`
    pub fn during_init(err: FeedError) -> Self {
        FeedError::Initialization(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_initialization_preserves_cause() {
        let cause = FeedError::parse("http://x/menu", "`key=` marker not found");
        let err = FeedError::during_init(cause);

        assert!(err.to_string().starts_with("feed initialization failed"));
        let source = err.source().expect("cause should be preserved");
        assert!(source.to_string().contains("`key=` marker not found"));
    }

    #[test]
    fn test_invalid_format_message() {
        let err = FeedError::InvalidFormat("xml".to_string());
        assert!(err.to_string().contains("\"xml\""));
        assert!(err.to_string().contains("csv"));
    }
}
