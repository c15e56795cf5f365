//! A single cache's report on how it handled a request.
//!
//! [`HandledRequestCache`] is one member of an RFC 9211 `Cache-Status`
//! header: the identifier of the cache plus parameters describing whether
//! the response came from the cache (`hit`) or from the next hop (`fwd`).
//!
//! ```text
//! Cache-Status: "cache-01";fwd=uri-miss;fwd-status=200;stored
//! ```
//!
//! A value is always in exactly one of two states:
//!
//! - **Hit**: `hit` is set and there is no [`Forward`]
//! - **Forwarded**: `hit` is unset and a [`Forward`] is attached
//!
//! [`was_hit`](HandledRequestCache::was_hit) and
//! [`was_forwarded`](HandledRequestCache::was_forwarded) are the only
//! transitions between them.
//!
//! # Example
//!
//! ```
//! use cache_status::{Forward, ForwardedReason, HandledRequestCache};
//!
//! let status = HandledRequestCache::served_by_string("cache-01")?
//!     .was_forwarded(Forward::try_new(ForwardedReason::CacheKeyRules, Some(504), false, false)?)?;
//!
//! assert_eq!(
//!     status.to_wire_value()?,
//!     r#""cache-01";fwd=cache-key-rules;fwd-status=504"#
//! );
//!
//! let parsed = HandledRequestCache::from_wire_value(r#""cache-01"; hit; ttl=300; key="/a/b""#, None)?;
//! assert!(parsed.is_hit());
//! assert_eq!(parsed.ttl(), Some(300));
//! assert_eq!(parsed.key(), Some("/a/b"));
//! # Ok::<(), cache_status::Error>(())
//! ```

use std::str::FromStr;

use sfv::{BareItem, Item, Parser, SerializeValue};
use tracing::{debug, trace};

use crate::error::Error;
use crate::forward::{Forward, check_status_code};
use crate::schema::{self, Parameter, ValidatedParameters};
use crate::token::{Token, TokenOrString, representable};

/// How a single cache handled a request.
///
/// Immutable: every `with_*`/`was_*` method validates and returns a new
/// value, leaving `self` usable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandledRequestCache {
    served_by: TokenOrString,
    hit: bool,
    forward: Option<Forward>,
    ttl: Option<i64>,
    key: Option<String>,
    detail: Option<TokenOrString>,
}

impl HandledRequestCache {
    /// The only constructor; every other way of producing a value goes through it.
    fn new(
        served_by: TokenOrString,
        hit: bool,
        forward: Option<Forward>,
        ttl: Option<i64>,
        key: Option<String>,
        detail: Option<TokenOrString>,
    ) -> Result<Self, Error> {
        if served_by.as_str().is_empty() || !served_by.is_representable() {
            return Err(Error::InvalidValue {
                field: "served-by",
                reason: "must be a non-empty token or a string of printable ASCII characters",
            });
        }
        if hit == forward.is_some() {
            return Err(Error::ConflictingHitAndForward);
        }
        if let Some(key) = &key
            && !representable(&BareItem::String(key.clone()))
        {
            return Err(Error::InvalidValue {
                field: "key",
                reason: "must be a string of printable ASCII characters",
            });
        }
        if let Some(ttl) = ttl
            && !representable(&BareItem::Integer(ttl))
        {
            return Err(Error::InvalidValue {
                field: "ttl",
                reason: "must be an integer of at most 15 digits",
            });
        }
        if let Some(detail) = &detail
            && !detail.is_representable()
        {
            return Err(Error::InvalidValue {
                field: "detail",
                reason: "must be a token or a string of printable ASCII characters",
            });
        }

        Ok(Self {
            served_by,
            hit,
            forward,
            ttl,
            key,
            detail,
        })
    }

    /// A hit reported by a cache identified with a string.
    pub fn served_by_string(identifier: impl Into<String>) -> Result<Self, Error> {
        Self::served_by(TokenOrString::String(identifier.into()))
    }

    /// A hit reported by a cache identified with a token.
    pub fn served_by_token(identifier: impl Into<String>) -> Result<Self, Error> {
        Self::served_by(TokenOrString::Token(Token::new(identifier)?))
    }

    /// A hit reported by the given cache identifier.
    pub fn served_by(identifier: TokenOrString) -> Result<Self, Error> {
        Self::new(identifier, true, None, None, None, None)
    }

    /// Parses one `Cache-Status` member.
    ///
    /// `default_forward_status` is used as the forward status code when the
    /// value is forwarded but carries no `fwd-status` of its own. Typically
    /// this is the status code of the response the header came with.
    pub fn from_wire_value(
        value: &str,
        default_forward_status: Option<u16>,
    ) -> Result<Self, Error> {
        Self::check_default_status(default_forward_status)?;
        let item = Parser::parse_item(value.as_bytes()).map_err(|err| {
            debug!(error = err, value, "failed to parse Cache-Status value");
            Error::MalformedWireValue(err)
        })?;
        Self::from_checked_item(&item, default_forward_status)
    }

    /// Builds a value from an already parsed structured field item.
    pub fn from_item(item: &Item, default_forward_status: Option<u16>) -> Result<Self, Error> {
        Self::check_default_status(default_forward_status)?;
        Self::from_checked_item(item, default_forward_status)
    }

    /// Decodes `item`; `default_forward_status` has already been range-checked.
    fn from_checked_item(item: &Item, default_forward_status: Option<u16>) -> Result<Self, Error> {
        let result = Self::decode(item, default_forward_status);
        match &result {
            Ok(status) => trace!(served_by = status.served_by_as_str(), "decoded Cache-Status"),
            Err(error) => debug!(%error, "rejected Cache-Status item"),
        }
        result
    }

    fn check_default_status(status: Option<u16>) -> Result<(), Error> {
        if let Some(code) = status {
            check_status_code(i64::from(code))?;
        }
        Ok(())
    }

    fn decode(item: &Item, default_forward_status: Option<u16>) -> Result<Self, Error> {
        let served_by =
            TokenOrString::from_bare_item(&item.bare_item).ok_or(Error::InvalidValue {
                field: "served-by",
                reason: "must be a token or a string",
            })?;
        let parameters = ValidatedParameters::for_item(&item.params)?;

        let forward = match parameters.token(Parameter::Forward) {
            Some(_) => Some(Forward::from_validated(&parameters, default_forward_status)?),
            None => None,
        };

        Self::new(
            served_by,
            parameters.flag(Parameter::Hit),
            forward,
            parameters.integer(Parameter::TimeToLive),
            parameters.string(Parameter::Key).map(str::to_owned),
            parameters.token_or_string(Parameter::Detail),
        )
    }

    /// Converts the value to a structured field item.
    ///
    /// Parameters follow the schema order and default values are left out.
    pub fn to_item(&self) -> Item {
        let values = [
            Some((Parameter::Hit, BareItem::Boolean(self.hit))),
            self.ttl
                .map(|ttl| (Parameter::TimeToLive, BareItem::Integer(ttl))),
            self.key
                .as_ref()
                .map(|key| (Parameter::Key, BareItem::String(key.clone()))),
            self.detail
                .as_ref()
                .map(|detail| (Parameter::Detail, detail.to_bare_item())),
        ]
        .into_iter()
        .flatten()
        .chain(self.forward.iter().flat_map(Forward::parameter_values));

        Item::with_params(self.served_by.to_bare_item(), schema::assemble(values))
    }

    /// Renders the value as `Cache-Status` header text.
    pub fn to_wire_value(&self) -> Result<String, Error> {
        let value = self
            .to_item()
            .serialize_value()
            .map_err(Error::Serialization)?;
        trace!(%value, "encoded Cache-Status");
        Ok(value)
    }

    /// The cache identifier as it appears on the wire.
    #[inline]
    pub fn served_by_value(&self) -> &TokenOrString {
        &self.served_by
    }

    /// The cache identifier as text, whether it is a token or a string.
    #[inline]
    pub fn served_by_as_str(&self) -> &str {
        self.served_by.as_str()
    }

    /// Whether the response was served from the cache.
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.hit
    }

    /// The forward details, present exactly when the request was not a hit.
    #[inline]
    pub fn forward(&self) -> Option<&Forward> {
        self.forward.as_ref()
    }

    /// Remaining freshness lifetime of the response, in seconds.
    #[inline]
    pub fn ttl(&self) -> Option<i64> {
        self.ttl
    }

    /// The cache key representation.
    #[inline]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Additional implementation-specific information.
    #[inline]
    pub fn detail(&self) -> Option<&TokenOrString> {
        self.detail.as_ref()
    }

    /// The request was satisfied by the cache.
    ///
    /// Drops any forward details.
    pub fn was_hit(&self) -> Result<Self, Error> {
        Self::new(
            self.served_by.clone(),
            true,
            None,
            self.ttl,
            self.key.clone(),
            self.detail.clone(),
        )
    }

    /// The request went forward towards the origin.
    ///
    /// Clears `hit` and attaches `forward`.
    pub fn was_forwarded(&self, forward: Forward) -> Result<Self, Error> {
        Self::new(
            self.served_by.clone(),
            false,
            Some(forward),
            self.ttl,
            self.key.clone(),
            self.detail.clone(),
        )
    }

    /// Sets the remaining freshness lifetime as calculated by the cache.
    pub fn with_ttl(&self, ttl: Option<i64>) -> Result<Self, Error> {
        Self::new(
            self.served_by.clone(),
            self.hit,
            self.forward,
            ttl,
            self.key.clone(),
            self.detail.clone(),
        )
    }

    /// Sets the implementation-specific cache key representation.
    pub fn with_key(&self, key: Option<impl Into<String>>) -> Result<Self, Error> {
        Self::new(
            self.served_by.clone(),
            self.hit,
            self.forward,
            self.ttl,
            key.map(Into::into),
            self.detail.clone(),
        )
    }

    /// Sets the detail as a quoted string.
    pub fn with_detail_as_string(&self, detail: Option<impl Into<String>>) -> Result<Self, Error> {
        self.with_detail(detail.map(|detail| TokenOrString::String(detail.into())))
    }

    /// Sets the detail as a bare token.
    ///
    /// Fails if the text is not a valid token.
    pub fn with_detail_as_token(&self, detail: Option<impl Into<String>>) -> Result<Self, Error> {
        let detail = detail.map(Token::new).transpose()?;
        self.with_detail(detail.map(TokenOrString::Token))
    }

    fn with_detail(&self, detail: Option<TokenOrString>) -> Result<Self, Error> {
        Self::new(
            self.served_by.clone(),
            self.hit,
            self.forward,
            self.ttl,
            self.key.clone(),
            detail,
        )
    }
}

impl FromStr for HandledRequestCache {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire_value(s, None)
    }
}

impl TryFrom<&Item> for HandledRequestCache {
    type Error = Error;

    fn try_from(item: &Item) -> Result<Self, Self::Error> {
        Self::from_item(item, None)
    }
}

impl From<&HandledRequestCache> for Item {
    fn from(status: &HandledRequestCache) -> Self {
        status.to_item()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ForwardedReason;

    fn hit() -> HandledRequestCache {
        HandledRequestCache::served_by_string("cache-01").unwrap()
    }

    #[test]
    fn test_served_by_factories_produce_hits() {
        let by_string = hit();
        assert!(by_string.is_hit());
        assert!(by_string.forward().is_none());
        assert!(!by_string.served_by_value().is_token());

        let by_token = HandledRequestCache::served_by_token("ExampleCache").unwrap();
        assert!(by_token.is_hit());
        assert!(by_token.served_by_value().is_token());
        assert_eq!(by_token.served_by_as_str(), "ExampleCache");
    }

    #[test]
    fn test_served_by_rejects_unrepresentable_identifiers() {
        assert!(matches!(
            HandledRequestCache::served_by_string(""),
            Err(Error::InvalidValue { field: "served-by", .. })
        ));
        assert!(matches!(
            HandledRequestCache::served_by_string("tab\there"),
            Err(Error::InvalidValue { field: "served-by", .. })
        ));
        assert!(matches!(
            HandledRequestCache::served_by_token("not a token"),
            Err(Error::InvalidValue { field: "token", .. })
        ));
    }

    #[test]
    fn test_state_transitions() {
        let forward = Forward::new(ForwardedReason::Miss);
        let forwarded = hit().was_forwarded(forward).unwrap();
        assert!(!forwarded.is_hit());
        assert_eq!(forwarded.forward(), Some(&forward));

        let back = forwarded.was_hit().unwrap();
        assert!(back.is_hit());
        assert_eq!(back.forward(), None);

        // the previous value stays intact
        assert!(!forwarded.is_hit());
    }

    #[test]
    fn test_with_methods_preserve_other_fields() {
        let status = hit()
            .with_ttl(Some(60))
            .unwrap()
            .with_key(Some("/a"))
            .unwrap()
            .with_detail_as_token(Some("memory"))
            .unwrap()
            .was_forwarded(Forward::new(ForwardedReason::Stale))
            .unwrap();

        assert_eq!(status.ttl(), Some(60));
        assert_eq!(status.key(), Some("/a"));
        assert_eq!(
            status.detail(),
            Some(&TokenOrString::Token(Token::new("memory").unwrap()))
        );

        let cleared = status
            .with_ttl(None)
            .unwrap()
            .with_key(None::<String>)
            .unwrap()
            .with_detail_as_string(None::<String>)
            .unwrap();
        assert_eq!(cleared.ttl(), None);
        assert_eq!(cleared.key(), None);
        assert_eq!(cleared.detail(), None);
        assert_eq!(cleared.forward(), status.forward());
    }

    #[test]
    fn test_with_methods_validate() {
        assert!(matches!(
            hit().with_ttl(Some(1_000_000_000_000_000)),
            Err(Error::InvalidValue { field: "ttl", .. })
        ));
        assert!(matches!(
            hit().with_key(Some("caf\u{e9}")),
            Err(Error::InvalidValue { field: "key", .. })
        ));
        assert!(matches!(
            hit().with_detail_as_string(Some("line\nbreak")),
            Err(Error::InvalidValue { field: "detail", .. })
        ));
        assert!(matches!(
            hit().with_detail_as_token(Some("two words")),
            Err(Error::InvalidValue { field: "token", .. })
        ));
    }

    #[test]
    fn test_empty_token_detail_is_rejected() {
        assert!(matches!(
            hit().with_detail_as_token(Some("")),
            Err(Error::InvalidValue { field: "token", .. })
        ));
        assert!(matches!(
            HandledRequestCache::served_by_token(""),
            Err(Error::InvalidValue { field: "token", .. })
        ));

        // an empty string detail is still a valid quoted string
        let status = hit().with_detail_as_string(Some("")).unwrap();
        let wire = status.to_wire_value().unwrap();
        assert_eq!(wire, r#""cache-01";hit;detail="""#);
        assert_eq!(HandledRequestCache::from_wire_value(&wire, None), Ok(status));
    }

    #[test]
    fn test_encode_forwarded() {
        let status = hit()
            .was_forwarded(
                Forward::try_new(ForwardedReason::CacheKeyRules, Some(504), false, false).unwrap(),
            )
            .unwrap();

        assert_eq!(
            status.to_wire_value().unwrap(),
            r#""cache-01";fwd=cache-key-rules;fwd-status=504"#
        );
    }

    #[test]
    fn test_encode_hit_with_all_fields() {
        let status = HandledRequestCache::served_by_token("ExampleCache")
            .unwrap()
            .with_ttl(Some(376))
            .unwrap()
            .with_key(Some("/a/b"))
            .unwrap()
            .with_detail_as_string(Some("in memory"))
            .unwrap();

        assert_eq!(
            status.to_wire_value().unwrap(),
            r#"ExampleCache;hit;ttl=376;key="/a/b";detail="in memory""#
        );
    }

    #[test]
    fn test_encode_places_forward_flags_after_detail() {
        let status = hit()
            .with_detail_as_token(Some("shield"))
            .unwrap()
            .was_forwarded(
                Forward::try_new(ForwardedReason::UriMiss, Some(200), true, true).unwrap(),
            )
            .unwrap();

        assert_eq!(
            status.to_wire_value().unwrap(),
            r#""cache-01";fwd=uri-miss;fwd-status=200;detail=shield;collapsed;stored"#
        );
    }

    #[test]
    fn test_decode_hit() {
        let status =
            HandledRequestCache::from_wire_value(r#""cache-01"; hit; ttl=300; key="/a/b""#, None)
                .unwrap();

        assert_eq!(status.served_by_as_str(), "cache-01");
        assert!(status.is_hit());
        assert_eq!(status.forward(), None);
        assert_eq!(status.ttl(), Some(300));
        assert_eq!(status.key(), Some("/a/b"));
        assert_eq!(status.detail(), None);
    }

    #[test]
    fn test_decode_forwarded_with_default_status() {
        let status = HandledRequestCache::from_wire_value("edge;fwd=stale;stored", Some(200))
            .unwrap();
        let forward = status.forward().unwrap();
        assert_eq!(forward.reason(), ForwardedReason::Stale);
        assert_eq!(forward.status_code(), Some(200));
        assert!(forward.stored());
        assert!(!forward.collapsed());

        let status =
            HandledRequestCache::from_wire_value("edge;fwd=stale;fwd-status=304", Some(200))
                .unwrap();
        assert_eq!(status.forward().unwrap().status_code(), Some(304));
    }

    #[test]
    fn test_decode_rejects_hit_and_forward() {
        assert_eq!(
            HandledRequestCache::from_wire_value(r#""cache-01"; hit; fwd=cache"#, None),
            Err(Error::ConflictingHitAndForward)
        );
        assert_eq!(
            HandledRequestCache::from_wire_value(r#""cache-01"; ttl=3"#, None),
            Err(Error::ConflictingHitAndForward)
        );
    }

    #[test]
    fn test_decode_rejects_schema_violations() {
        assert_eq!(
            HandledRequestCache::from_wire_value("edge;hit;age=3", None),
            Err(Error::UnknownParameter("age".into()))
        );
        assert_eq!(
            HandledRequestCache::from_wire_value(r#"edge;hit;ttl="3""#, None),
            Err(Error::InvalidParameterType {
                key: "ttl".into(),
                expected: crate::ValueKind::Integer,
            })
        );
        assert_eq!(
            HandledRequestCache::from_wire_value("edge;fwd=bogus", None),
            Err(Error::UnknownReason("bogus".into()))
        );
        assert_eq!(
            HandledRequestCache::from_wire_value("edge;fwd=miss;fwd-status=700", None),
            Err(Error::InvalidStatusCode(700))
        );
    }

    #[test]
    fn test_decode_rejects_non_textual_served_by() {
        assert!(matches!(
            HandledRequestCache::from_wire_value("42;hit", None),
            Err(Error::InvalidValue { field: "served-by", .. })
        ));
        assert!(matches!(
            HandledRequestCache::from_wire_value(r#""";hit"#, None),
            Err(Error::InvalidValue { field: "served-by", .. })
        ));
    }

    #[test]
    fn test_decode_rejects_malformed_input() {
        assert!(matches!(
            HandledRequestCache::from_wire_value(r#""unterminated;hit"#, None),
            Err(Error::MalformedWireValue(_))
        ));
        assert!(matches!(
            HandledRequestCache::from_wire_value("edge;hit, other;hit", None),
            Err(Error::MalformedWireValue(_))
        ));
    }

    #[test]
    fn test_default_forward_status_is_validated_first() {
        assert_eq!(
            HandledRequestCache::from_wire_value("not valid at all ((", Some(99)),
            Err(Error::InvalidStatusCode(99))
        );
    }

    #[test]
    fn test_from_item_validates_default_forward_status() {
        let item = Parser::parse_item(b"edge;fwd=miss").unwrap();
        assert_eq!(
            HandledRequestCache::from_item(&item, Some(600)),
            Err(Error::InvalidStatusCode(600))
        );
        assert_eq!(
            HandledRequestCache::from_item(&item, Some(204))
                .unwrap()
                .forward()
                .and_then(|f| f.status_code()),
            Some(204)
        );
    }

    #[test]
    fn test_from_str_and_item_conversions() {
        let status: HandledRequestCache = "edge;hit;detail=memory".parse().unwrap();
        let item = Item::from(&status);
        assert_eq!(HandledRequestCache::try_from(&item), Ok(status));
    }
}
