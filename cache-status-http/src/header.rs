//! Cache-Status header support for `http` types.
//!
//! This module provides conversions between [`HandledRequestCache`] and
//! [`HeaderValue`], and the [`CacheStatusHeaderExt`] trait for attaching or
//! reading the header on header maps and responses.
//!
//! Each header line is treated as a single cache's report. Lines are never
//! merged or split.

use cache_status::HandledRequestCache;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::Response;
use tracing::debug;

use crate::error::Error;

/// The `cache-status` header name (RFC 9211).
pub const CACHE_STATUS: HeaderName = HeaderName::from_static("cache-status");

/// Renders a Cache-Status member as a header value.
pub fn to_header_value(status: &HandledRequestCache) -> Result<HeaderValue, Error> {
    let value = status.to_wire_value()?;
    Ok(HeaderValue::from_str(&value)?)
}

/// Parses a single header value into a Cache-Status member.
///
/// `default_forward_status` fills in `fwd-status` for forwarded values that
/// do not carry one.
pub fn from_header_value(
    value: &HeaderValue,
    default_forward_status: Option<u16>,
) -> Result<HandledRequestCache, Error> {
    let text = value.to_str()?;
    HandledRequestCache::from_wire_value(text, default_forward_status).map_err(|error| {
        debug!(%error, value = text, "invalid Cache-Status header");
        Error::from(error)
    })
}

/// Extension trait for reading and writing the `Cache-Status` header.
///
/// # Example
///
/// ```
/// use cache_status::{Forward, ForwardedReason, HandledRequestCache};
/// use cache_status_http::{CACHE_STATUS, CacheStatusHeaderExt};
///
/// let mut response = http::Response::builder()
///     .status(200)
///     .body(())
///     .unwrap();
///
/// let status = HandledRequestCache::served_by_token("edge")
///     .unwrap()
///     .was_forwarded(Forward::new(ForwardedReason::UriMiss))
///     .unwrap();
/// response.append_cache_status(&status).unwrap();
///
/// assert_eq!(response.headers()[CACHE_STATUS], "edge;fwd=uri-miss");
///
/// // the response status fills in the missing `fwd-status`
/// let parsed = response.cache_statuses().unwrap();
/// assert_eq!(parsed[0].forward().unwrap().status_code(), Some(200));
/// ```
pub trait CacheStatusHeaderExt {
    /// Appends `status` as a new `Cache-Status` header line.
    fn append_cache_status(&mut self, status: &HandledRequestCache) -> Result<(), Error>;

    /// Parses every `Cache-Status` header line, in order.
    fn cache_statuses(&self) -> Result<Vec<HandledRequestCache>, Error>;
}

fn parse_all(
    headers: &HeaderMap,
    default_forward_status: Option<u16>,
) -> Result<Vec<HandledRequestCache>, Error> {
    headers
        .get_all(CACHE_STATUS)
        .iter()
        .map(|value| from_header_value(value, default_forward_status))
        .collect()
}

impl CacheStatusHeaderExt for HeaderMap {
    fn append_cache_status(&mut self, status: &HandledRequestCache) -> Result<(), Error> {
        self.append(CACHE_STATUS, to_header_value(status)?);
        Ok(())
    }

    fn cache_statuses(&self) -> Result<Vec<HandledRequestCache>, Error> {
        parse_all(self, None)
    }
}

impl<B> CacheStatusHeaderExt for Response<B> {
    fn append_cache_status(&mut self, status: &HandledRequestCache) -> Result<(), Error> {
        self.headers_mut().append_cache_status(status)
    }

    /// Uses the response status code as the default forward status.
    fn cache_statuses(&self) -> Result<Vec<HandledRequestCache>, Error> {
        parse_all(self.headers(), Some(self.status().as_u16()))
    }
}

#[cfg(test)]
mod tests {
    use cache_status::{Forward, ForwardedReason};

    use super::*;

    #[test]
    fn test_header_value_round_trip() {
        let status = HandledRequestCache::served_by_string("cache-01")
            .unwrap()
            .with_ttl(Some(30))
            .unwrap();
        let value = to_header_value(&status).unwrap();

        assert_eq!(value, r#""cache-01";hit;ttl=30"#);
        assert_eq!(from_header_value(&value, None).unwrap(), status);
    }

    #[test]
    fn test_non_ascii_header_is_rejected() {
        let value = HeaderValue::from_bytes(b"caf\xc3\xa9;hit").unwrap();
        assert!(matches!(
            from_header_value(&value, None),
            Err(Error::NotAscii(_))
        ));
    }

    #[test]
    fn test_invalid_member_is_reported() {
        let value = HeaderValue::from_static("edge;hit;fwd=miss");
        assert!(matches!(
            from_header_value(&value, None),
            Err(Error::CacheStatus(
                cache_status::Error::ConflictingHitAndForward
            ))
        ));
    }

    #[test]
    fn test_header_map_append_keeps_lines_separate() {
        let mut headers = HeaderMap::new();
        let origin_side = HandledRequestCache::served_by_token("origin-cache")
            .unwrap()
            .was_forwarded(Forward::new(ForwardedReason::Miss))
            .unwrap();
        let client_side = HandledRequestCache::served_by_token("edge").unwrap();

        headers.append_cache_status(&origin_side).unwrap();
        headers.append_cache_status(&client_side).unwrap();

        assert_eq!(headers.get_all(CACHE_STATUS).iter().count(), 2);
        assert_eq!(
            headers.cache_statuses().unwrap(),
            vec![origin_side, client_side]
        );
    }
}
