//! Error types for building and parsing Cache-Status values.
//!
//! Every failure is reported at the point where an inconsistent value would
//! otherwise come into existence: a constructor, a `with_*` method, or a
//! parse. There is no partially valid record.

use crate::schema::ValueKind;

/// Errors produced while constructing, decoding or encoding Cache-Status values.
///
/// # Examples
///
/// ```
/// use cache_status::{Error, ForwardedReason};
///
/// let err = ForwardedReason::from_token("not-a-reason").unwrap_err();
/// assert_eq!(err, Error::UnknownReason("not-a-reason".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A forward status code, or a default forward status code, is outside `100..=599`.
    #[error("invalid status code {0}: expected a value between 100 and 599")]
    InvalidStatusCode(i64),

    /// A token does not name any known forwarding reason.
    #[error("unknown forward reason `{0}`")]
    UnknownReason(String),

    /// The value is both a hit and forwarded, or neither.
    #[error("the `hit` and `fwd` parameters are mutually exclusive and one of them is required")]
    ConflictingHitAndForward,

    /// A parameter key is not part of the Cache-Status vocabulary.
    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),

    /// A parameter carries a value of the wrong structured field type.
    #[error("parameter `{key}` must be {expected}")]
    InvalidParameterType {
        /// The offending parameter key.
        key: String,
        /// The type the parameter schema declares for this key.
        expected: ValueKind,
    },

    /// A forward fragment lacks its `fwd` parameter.
    #[error("missing forward reason: the `fwd` parameter is required")]
    MissingReason,

    /// The structured field grammar rejected the input.
    #[error("malformed Cache-Status value: {0}")]
    MalformedWireValue(&'static str),

    /// A field holds a value the structured field grammar cannot represent.
    #[error("invalid {field}: {reason}")]
    InvalidValue {
        /// Name of the field being set.
        field: &'static str,
        /// Why the value was refused.
        reason: &'static str,
    },

    /// The structured field serializer refused to render the value.
    #[error("failed to serialize Cache-Status value: {0}")]
    Serialization(&'static str),
}
