//! Parameter schema for Cache-Status values.
//!
//! [`SCHEMA`] is the single table of recognized parameters. Encoding walks it
//! to order and filter parameters, decoding walks it to reject unknown keys
//! and mistyped values, so both directions agree on the vocabulary.
//!
//! | key          | type            | default |
//! |--------------|-----------------|---------|
//! | `hit`        | boolean         | `false` |
//! | `fwd`        | token           | absent  |
//! | `fwd-status` | integer         | absent  |
//! | `ttl`        | integer         | absent  |
//! | `key`        | string          | absent  |
//! | `detail`     | string or token | absent  |
//! | `collapsed`  | boolean         | `false` |
//! | `stored`     | boolean         | `false` |

use std::fmt;

use sfv::{BareItem, Parameters};

use crate::error::Error;
use crate::token::TokenOrString;

/// Structured field type expected for a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// `?1` / `?0`, or a bare key meaning `true`.
    Boolean,
    /// An integer within the structured field range.
    Integer,
    /// A quoted string.
    String,
    /// A bare token.
    Token,
    /// Either a quoted string or a bare token.
    StringOrToken,
}

impl ValueKind {
    /// Returns `true` if `value` carries the type this kind describes.
    pub fn accepts(&self, value: &BareItem) -> bool {
        matches!(
            (self, value),
            (ValueKind::Boolean, BareItem::Boolean(_))
                | (ValueKind::Integer, BareItem::Integer(_))
                | (ValueKind::String, BareItem::String(_))
                | (ValueKind::Token, BareItem::Token(_))
                | (ValueKind::StringOrToken, BareItem::String(_) | BareItem::Token(_))
        )
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::Boolean => "a boolean",
            ValueKind::Integer => "an integer",
            ValueKind::String => "a string",
            ValueKind::Token => "a token",
            ValueKind::StringOrToken => "a string or a token",
        })
    }
}

/// Value a parameter takes when it is not on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterDefault {
    /// The parameter is simply absent.
    Absent,
    /// A boolean parameter defaulting to `false`.
    False,
}

/// A recognized Cache-Status parameter.
///
/// Discriminants index into [`SCHEMA`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    /// `hit`: the request was satisfied by the cache.
    Hit = 0,
    /// `fwd`: the reason the request went forward.
    Forward = 1,
    /// `fwd-status`: status code of the forwarded response.
    ForwardStatus = 2,
    /// `ttl`: remaining freshness lifetime, in seconds.
    TimeToLive = 3,
    /// `key`: implementation-specific cache key representation.
    Key = 4,
    /// `detail`: additional implementation-specific information.
    Detail = 5,
    /// `collapsed`: the request was collapsed with another one.
    Collapsed = 6,
    /// `stored`: the forwarded response was stored.
    Stored = 7,
}

impl Parameter {
    /// Returns the wire key.
    pub const fn key(self) -> &'static str {
        match self {
            Parameter::Hit => "hit",
            Parameter::Forward => "fwd",
            Parameter::ForwardStatus => "fwd-status",
            Parameter::TimeToLive => "ttl",
            Parameter::Key => "key",
            Parameter::Detail => "detail",
            Parameter::Collapsed => "collapsed",
            Parameter::Stored => "stored",
        }
    }

    /// Returns the schema entry for this parameter.
    #[inline]
    pub fn rule(self) -> &'static ParameterRule {
        &SCHEMA[self as usize]
    }

    /// Looks up a parameter by its wire key.
    pub fn from_key(key: &str) -> Option<Parameter> {
        SCHEMA
            .iter()
            .map(|rule| rule.parameter)
            .find(|parameter| parameter.key() == key)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One row of the parameter schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterRule {
    /// The parameter described by this row.
    pub parameter: Parameter,
    /// Expected value type.
    pub kind: ValueKind,
    /// Value implied when the parameter is absent.
    pub default: ParameterDefault,
}

impl ParameterRule {
    const fn new(parameter: Parameter, kind: ValueKind, default: ParameterDefault) -> Self {
        Self {
            parameter,
            kind,
            default,
        }
    }

    /// Returns `true` if `value` is the implied default and must not be serialized.
    pub fn is_default(&self, value: &BareItem) -> bool {
        match self.default {
            ParameterDefault::Absent => false,
            ParameterDefault::False => matches!(value, BareItem::Boolean(false)),
        }
    }
}

/// Recognized parameters in canonical serialization order.
pub static SCHEMA: [ParameterRule; 8] = [
    ParameterRule::new(Parameter::Hit, ValueKind::Boolean, ParameterDefault::False),
    ParameterRule::new(Parameter::Forward, ValueKind::Token, ParameterDefault::Absent),
    ParameterRule::new(Parameter::ForwardStatus, ValueKind::Integer, ParameterDefault::Absent),
    ParameterRule::new(Parameter::TimeToLive, ValueKind::Integer, ParameterDefault::Absent),
    ParameterRule::new(Parameter::Key, ValueKind::String, ParameterDefault::Absent),
    ParameterRule::new(Parameter::Detail, ValueKind::StringOrToken, ParameterDefault::Absent),
    ParameterRule::new(Parameter::Collapsed, ValueKind::Boolean, ParameterDefault::False),
    ParameterRule::new(Parameter::Stored, ValueKind::Boolean, ParameterDefault::False),
];

/// Builds a parameter map in schema order, dropping values equal to their default.
///
/// When the same parameter is supplied twice the last value wins.
pub(crate) fn assemble(values: impl IntoIterator<Item = (Parameter, BareItem)>) -> Parameters {
    let mut slots: [Option<BareItem>; 8] = Default::default();
    for (parameter, value) in values {
        slots[parameter as usize] = Some(value);
    }

    let mut parameters = Parameters::new();
    for (rule, slot) in SCHEMA.iter().zip(slots) {
        if let Some(value) = slot
            && !rule.is_default(&value)
        {
            parameters.insert(rule.parameter.key().to_owned(), value);
        }
    }
    parameters
}

/// A parameter map whose keys and value types have been checked against [`SCHEMA`].
#[derive(Debug, Clone, Copy)]
pub struct ValidatedParameters<'a> {
    parameters: &'a Parameters,
}

impl<'a> ValidatedParameters<'a> {
    /// Checks every key and value type, reporting the first violation found.
    pub fn new(parameters: &'a Parameters) -> Result<Self, Error> {
        for (key, value) in parameters {
            let parameter =
                Parameter::from_key(key).ok_or_else(|| Error::UnknownParameter(key.clone()))?;
            let rule = parameter.rule();
            if !rule.kind.accepts(value) {
                return Err(Error::InvalidParameterType {
                    key: key.clone(),
                    expected: rule.kind,
                });
            }
        }
        Ok(Self { parameters })
    }

    /// Checks the parameters of a whole item.
    ///
    /// On top of [`new`](Self::new), exactly one of `hit` (true) or `fwd`
    /// must be present, and forward details require `fwd`.
    pub fn for_item(parameters: &'a Parameters) -> Result<Self, Error> {
        let validated = Self::new(parameters)?;
        let hit = validated.flag(Parameter::Hit);
        let forwarded = validated.get(Parameter::Forward).is_some();
        if hit == forwarded {
            return Err(Error::ConflictingHitAndForward);
        }
        let forward_details = validated.get(Parameter::ForwardStatus).is_some()
            || validated.flag(Parameter::Collapsed)
            || validated.flag(Parameter::Stored);
        if !forwarded && forward_details {
            return Err(Error::MissingReason);
        }
        Ok(validated)
    }

    fn get(&self, parameter: Parameter) -> Option<&'a BareItem> {
        self.parameters.get(parameter.key())
    }

    /// Boolean value, `false` when absent.
    pub fn flag(&self, parameter: Parameter) -> bool {
        self.get(parameter)
            .and_then(BareItem::as_bool)
            .unwrap_or(false)
    }

    /// Integer value, if present.
    pub fn integer(&self, parameter: Parameter) -> Option<i64> {
        self.get(parameter).and_then(BareItem::as_int)
    }

    /// String value, if present.
    pub fn string(&self, parameter: Parameter) -> Option<&'a str> {
        self.get(parameter).and_then(BareItem::as_str)
    }

    /// Token value, if present.
    pub fn token(&self, parameter: Parameter) -> Option<&'a str> {
        self.get(parameter).and_then(BareItem::as_token)
    }

    /// String or token value, if present.
    pub fn token_or_string(&self, parameter: Parameter) -> Option<TokenOrString> {
        self.get(parameter).and_then(TokenOrString::from_bare_item)
    }
}
