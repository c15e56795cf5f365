//! Error type for reading and writing the `Cache-Status` header.

use http::header::{InvalidHeaderValue, ToStrError};

/// Errors raised while moving Cache-Status values in and out of HTTP headers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The header value is not a valid Cache-Status member.
    #[error(transparent)]
    CacheStatus(#[from] cache_status::Error),

    /// The rendered value cannot be used as an HTTP header value.
    #[error("invalid Cache-Status header value: {0}")]
    InvalidHeaderValue(#[from] InvalidHeaderValue),

    /// The received header contains bytes outside visible ASCII.
    #[error("Cache-Status header is not visible ASCII: {0}")]
    NotAscii(#[from] ToStrError),
}
