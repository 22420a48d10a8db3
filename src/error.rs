//! Error types for crawl operations.
//!
//! Only two conditions are fatal: a seed URL that does not parse and a
//! browser that cannot be acquired. Everything else is recorded per page
//! and the crawl moves on.

use thiserror::Error;

/// Custom error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    /// URL could not be parsed as an absolute URL
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Browser could not be found, downloaded, or launched
    #[error("browser error: {0}")]
    Browser(String),

    /// Navigation did not reach network idle within the timeout, or the
    /// network request itself failed. Recorded in the page result, never
    /// retried.
    #[error("navigation failed for {url}: {message}")]
    Navigation { url: String, message: String },

    /// Tier name not present in the registry
    #[error("unknown tier '{0}'")]
    UnknownTier(String),

    /// Configuration value out of range
    #[error("configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

/// Convenience alias for Result with `CrawlError`
pub type CrawlResult<T> = Result<T, CrawlError>;
