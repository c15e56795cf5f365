//! Serializable producer/consumer settings.
//!
//! A cache that emits `Cache-Status` usually has a fixed identity and a few
//! defaults. [`CacheStatusConfig`] captures them in a form that can be
//! loaded from YAML or any other serde format.
//!
//! ```yaml
//! served_by: ExampleCache
//! identifier: Token
//! detail: memory
//! detail_kind: Token
//! default_forward_status: 200
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::forward::check_status_code;
use crate::handled::HandledRequestCache;
use crate::token::{Token, TokenOrString};

/// Wire form of a configured identifier or detail.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
pub enum IdentifierKind {
    /// Render as a quoted string (default).
    #[default]
    String,
    /// Render as a bare token.
    Token,
}

impl IdentifierKind {
    fn apply(self, value: String) -> Result<TokenOrString, Error> {
        match self {
            IdentifierKind::String => Ok(TokenOrString::String(value)),
            IdentifierKind::Token => Ok(TokenOrString::Token(Token::new(value)?)),
        }
    }
}

/// Settings describing the cache that reports its status.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CacheStatusConfig {
    /// Identifier of the cache.
    pub served_by: String,
    /// Whether the identifier is a token or a string.
    #[serde(default)]
    pub identifier: IdentifierKind,
    /// Fixed `detail` parameter attached to every value.
    #[serde(default)]
    pub detail: Option<String>,
    /// Whether the detail is a token or a string.
    #[serde(default)]
    pub detail_kind: IdentifierKind,
    /// Fixed `ttl` parameter attached to every value.
    #[serde(default)]
    pub ttl: Option<i64>,
    /// Status code assumed for forwarded values lacking `fwd-status` when parsing.
    #[serde(default)]
    pub default_forward_status: Option<u16>,
}

impl CacheStatusConfig {
    /// Creates a configuration for a cache identified by a string.
    pub fn new(served_by: impl Into<String>) -> Self {
        Self {
            served_by: served_by.into(),
            identifier: IdentifierKind::default(),
            detail: None,
            detail_kind: IdentifierKind::default(),
            ttl: None,
            default_forward_status: None,
        }
    }

    /// Checks every field and returns the initial hit value this cache reports.
    pub fn build(&self) -> Result<HandledRequestCache, Error> {
        if let Some(code) = self.default_forward_status {
            check_status_code(i64::from(code))?;
        }

        let mut status =
            HandledRequestCache::served_by(self.identifier.apply(self.served_by.clone())?)?;
        if let Some(detail) = &self.detail {
            status = match self.detail_kind {
                IdentifierKind::String => status.with_detail_as_string(Some(detail.as_str()))?,
                IdentifierKind::Token => status.with_detail_as_token(Some(detail.as_str()))?,
            };
        }
        if self.ttl.is_some() {
            status = status.with_ttl(self.ttl)?;
        }
        Ok(status)
    }

    /// Parses a value received from another cache, applying `default_forward_status`.
    pub fn parse(&self, value: &str) -> Result<HandledRequestCache, Error> {
        HandledRequestCache::from_wire_value(value, self.default_forward_status)
    }
}
