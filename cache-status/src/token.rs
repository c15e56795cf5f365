//! Token and token-or-string value types.
//!
//! Structured fields distinguish a bare token (`cache-01`) from a quoted
//! string (`"cache-01"`). Both carry text, but they are different values on
//! the wire and must survive a parse/serialize round trip unchanged.

use std::fmt;
use std::str::FromStr;

use sfv::{BareItem, Item, SerializeValue};

use crate::error::Error;

/// A structured field token.
///
/// Construction goes through the structured field serializer, so a `Token`
/// always holds text that is valid as a bare token on the wire.
///
/// # Example
/// ```
/// use cache_status::Token;
///
/// let token = Token::new("edge-cache").unwrap();
/// assert_eq!(token.as_str(), "edge-cache");
/// assert!(Token::new("two words").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    /// Creates a token, failing if the text is not a valid structured field token.
    pub fn new(value: impl Into<String>) -> Result<Self, Error> {
        let value = value.into();
        if value.is_empty() || !representable(&BareItem::Token(value.clone())) {
            return Err(Error::InvalidValue {
                field: "token",
                reason: "must start with a letter or `*` and contain only token characters",
            });
        }
        Ok(Self(value))
    }

    /// Wraps text that the structured field parser already accepted as a token.
    pub(crate) fn from_parsed(value: &str) -> Self {
        Self(value.to_owned())
    }

    /// Returns the token text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the token and returns its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for Token {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Token {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Token {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Token {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Token> for BareItem {
    fn from(token: Token) -> Self {
        BareItem::Token(token.0)
    }
}

/// A value that is either a token or a string.
///
/// Used for the served-by identifier and the `detail` parameter, both of
/// which RFC 9211 allows in either form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenOrString {
    /// A bare token.
    Token(Token),
    /// A quoted string.
    String(String),
}

impl TokenOrString {
    /// Returns the text regardless of the wire form.
    pub fn as_str(&self) -> &str {
        match self {
            TokenOrString::Token(token) => token.as_str(),
            TokenOrString::String(string) => string,
        }
    }

    /// Returns `true` if the value is a token.
    #[inline]
    pub fn is_token(&self) -> bool {
        matches!(self, TokenOrString::Token(_))
    }

    pub(crate) fn to_bare_item(&self) -> BareItem {
        match self {
            TokenOrString::Token(token) => BareItem::Token(token.0.clone()),
            TokenOrString::String(string) => BareItem::String(string.clone()),
        }
    }

    /// Reads a parsed bare item, returning `None` for any other type.
    pub(crate) fn from_bare_item(item: &BareItem) -> Option<Self> {
        match item {
            BareItem::Token(token) => Some(TokenOrString::Token(Token::from_parsed(token))),
            BareItem::String(string) => Some(TokenOrString::String(string.clone())),
            _ => None,
        }
    }

    /// Checks that the value can be rendered by the structured field serializer.
    pub(crate) fn is_representable(&self) -> bool {
        match self {
            TokenOrString::Token(token) if token.as_str().is_empty() => false,
            _ => representable(&self.to_bare_item()),
        }
    }
}

impl fmt::Display for TokenOrString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Token> for TokenOrString {
    fn from(token: Token) -> Self {
        TokenOrString::Token(token)
    }
}

impl From<String> for TokenOrString {
    fn from(string: String) -> Self {
        TokenOrString::String(string)
    }
}

impl From<&str> for TokenOrString {
    fn from(string: &str) -> Self {
        TokenOrString::String(string.to_owned())
    }
}

/// Asks the structured field serializer whether it can render `value`.
pub(crate) fn representable(value: &BareItem) -> bool {
    Item::new(value.clone()).serialize_value().is_ok()
}
