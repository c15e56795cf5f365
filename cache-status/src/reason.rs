//! Reasons a cache forwards a request towards the origin.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;

use crate::error::Error;
use crate::token::Token;

/// Why a request was forwarded instead of being served from the cache.
///
/// Each variant has exactly one wire token. The first group is the set
/// registered by RFC 9211, the second covers the extended vocabulary used by
/// caches that report more specific causes.
///
/// # Example
/// ```
/// use cache_status::ForwardedReason;
///
/// let reason = ForwardedReason::from_token("uri-miss").unwrap();
/// assert_eq!(reason, ForwardedReason::UriMiss);
/// assert_eq!(reason.as_str(), "uri-miss");
/// assert_eq!(ForwardedReason::try_from_token("nope"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForwardedReason {
    /// The cache was configured to not handle this request.
    Bypass,
    /// The request method's semantics require the request to be forwarded.
    Method,
    /// The cache did not contain any responses that matched the request URI.
    UriMiss,
    /// Responses matched the URI but not the selecting header fields.
    VaryMiss,
    /// The cache did not contain any responses that could be used.
    Miss,
    /// The cache was able to select a fresh response, but request semantics prevented its use.
    Request,
    /// The cache was able to select a response, but it was stale.
    Stale,
    /// The cache was able to select a partial response, but it did not cover the request.
    Partial,

    /// No stored response exists for the request.
    CacheAbsent,
    /// The stored response was stale and had to be revalidated.
    CacheStale,
    /// The request method is not one the cache serves.
    RequestMethodDisallowed,
    /// The client explicitly asked for the request to go forward.
    RequestExplicit,
    /// Cache key rules excluded the request from the cache.
    CacheKeyRules,
    /// The cache was bypassed by configuration.
    CacheBypass,
    /// The request was collapsed onto another in-flight request.
    CollapsedRequest,
    /// Only part of the response was available in the cache.
    PartialResponse,
    /// A socket error occurred while talking to the cache.
    SocketError,
    /// The request URI was too long to be used as a cache key.
    UriTooLong,
    /// A stale response was served while it is revalidated in the background.
    ContentStaleWhileRevalidate,
    /// A stale response was served because the origin returned an error.
    ContentStaleIfError,
}

lazy_static! {
    static ref BY_TOKEN: HashMap<&'static str, ForwardedReason> = ForwardedReason::ALL
        .iter()
        .map(|reason| (reason.as_str(), *reason))
        .collect();
}

impl ForwardedReason {
    /// Every reason, in declaration order.
    pub const ALL: [ForwardedReason; 20] = [
        ForwardedReason::Bypass,
        ForwardedReason::Method,
        ForwardedReason::UriMiss,
        ForwardedReason::VaryMiss,
        ForwardedReason::Miss,
        ForwardedReason::Request,
        ForwardedReason::Stale,
        ForwardedReason::Partial,
        ForwardedReason::CacheAbsent,
        ForwardedReason::CacheStale,
        ForwardedReason::RequestMethodDisallowed,
        ForwardedReason::RequestExplicit,
        ForwardedReason::CacheKeyRules,
        ForwardedReason::CacheBypass,
        ForwardedReason::CollapsedRequest,
        ForwardedReason::PartialResponse,
        ForwardedReason::SocketError,
        ForwardedReason::UriTooLong,
        ForwardedReason::ContentStaleWhileRevalidate,
        ForwardedReason::ContentStaleIfError,
    ];

    /// Returns the wire token text.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ForwardedReason::Bypass => "bypass",
            ForwardedReason::Method => "method",
            ForwardedReason::UriMiss => "uri-miss",
            ForwardedReason::VaryMiss => "vary-miss",
            ForwardedReason::Miss => "miss",
            ForwardedReason::Request => "request",
            ForwardedReason::Stale => "stale",
            ForwardedReason::Partial => "partial",
            ForwardedReason::CacheAbsent => "cache-absent",
            ForwardedReason::CacheStale => "cache-stale",
            ForwardedReason::RequestMethodDisallowed => "request-method-disallowed",
            ForwardedReason::RequestExplicit => "request-explicit",
            ForwardedReason::CacheKeyRules => "cache-key-rules",
            ForwardedReason::CacheBypass => "cache-bypass",
            ForwardedReason::CollapsedRequest => "collapsed-request",
            ForwardedReason::PartialResponse => "partial-response",
            ForwardedReason::SocketError => "socket-error",
            ForwardedReason::UriTooLong => "uri-too-long",
            ForwardedReason::ContentStaleWhileRevalidate => "content-stale-while-revalidate",
            ForwardedReason::ContentStaleIfError => "content-stale-if-error",
        }
    }

    /// Returns the reason as a structured field token.
    pub fn to_token(&self) -> Token {
        Token::from_parsed(self.as_str())
    }

    /// Looks up the reason matching `token` exactly.
    pub fn from_token(token: impl AsRef<str>) -> Result<Self, Error> {
        let token = token.as_ref();
        Self::try_from_token(token).ok_or_else(|| Error::UnknownReason(token.to_owned()))
    }

    /// Like [`from_token`](Self::from_token), returning `None` for unknown tokens.
    pub fn try_from_token(token: impl AsRef<str>) -> Option<Self> {
        BY_TOKEN.get(token.as_ref()).copied()
    }
}

impl fmt::Display for ForwardedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForwardedReason {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s)
    }
}

impl From<ForwardedReason> for Token {
    fn from(reason: ForwardedReason) -> Self {
        reason.to_token()
    }
}

impl TryFrom<&Token> for ForwardedReason {
    type Error = Error;

    fn try_from(token: &Token) -> Result<Self, Self::Error> {
        Self::from_token(token)
    }
}
