//! The forward sub-record of a Cache-Status value.
//!
//! A [`Forward`] describes why a request went past the cache and what came
//! back. On the wire it is the `fwd`, `fwd-status`, `collapsed` and `stored`
//! parameters of the owning item.

use sfv::{BareItem, Parameters};

use crate::error::Error;
use crate::reason::ForwardedReason;
use crate::schema::{self, Parameter, ValidatedParameters};
use crate::token::Token;

/// Lowest status code accepted for `fwd-status`.
pub const MIN_STATUS_CODE: u16 = 100;
/// Highest status code accepted for `fwd-status`.
pub const MAX_STATUS_CODE: u16 = 599;

/// Checks that `code` is an HTTP status code in `100..=599`.
pub(crate) fn check_status_code(code: i64) -> Result<u16, Error> {
    match u16::try_from(code) {
        Ok(status) if (MIN_STATUS_CODE..=MAX_STATUS_CODE).contains(&status) => Ok(status),
        _ => Err(Error::InvalidStatusCode(code)),
    }
}

/// Details of a request forwarded towards the origin.
///
/// `Forward` is an immutable value. The `with_*` methods return a new
/// instance and leave the original untouched.
///
/// # Example
/// ```
/// use cache_status::{Forward, ForwardedReason};
///
/// let forward = Forward::new(ForwardedReason::UriMiss)
///     .with_status_code(Some(200))
///     .unwrap()
///     .with_stored(true);
///
/// assert_eq!(forward.status_code(), Some(200));
/// assert!(forward.stored());
/// assert!(!forward.collapsed());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Forward {
    reason: ForwardedReason,
    status_code: Option<u16>,
    collapsed: bool,
    stored: bool,
}

impl Forward {
    /// Creates a forward with no status code, not collapsed and not stored.
    pub fn new(reason: ForwardedReason) -> Self {
        Self {
            reason,
            status_code: None,
            collapsed: false,
            stored: false,
        }
    }

    /// Creates a forward from all of its fields.
    ///
    /// Fails with [`Error::InvalidStatusCode`] when `status_code` is outside `100..=599`.
    pub fn try_new(
        reason: ForwardedReason,
        status_code: Option<u16>,
        collapsed: bool,
        stored: bool,
    ) -> Result<Self, Error> {
        if let Some(code) = status_code {
            check_status_code(i64::from(code))?;
        }
        Ok(Self {
            reason,
            status_code,
            collapsed,
            stored,
        })
    }

    /// Creates a forward from a reason given as plain text.
    ///
    /// The text must be a valid token naming a known reason.
    pub fn from_reason(reason: &str) -> Result<Self, Error> {
        let token = Token::new(reason)?;
        Ok(Self::new(ForwardedReason::from_token(token)?))
    }

    /// The reason the request was forwarded.
    #[inline]
    pub fn reason(&self) -> ForwardedReason {
        self.reason
    }

    /// Status code returned by the next hop, if known.
    #[inline]
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Whether the request was collapsed with another one.
    #[inline]
    pub fn collapsed(&self) -> bool {
        self.collapsed
    }

    /// Whether the cache stored the forwarded response.
    #[inline]
    pub fn stored(&self) -> bool {
        self.stored
    }

    /// Returns a copy with a different reason.
    pub fn with_reason(&self, reason: ForwardedReason) -> Self {
        Self { reason, ..*self }
    }

    /// Returns a copy whose reason is parsed from plain text.
    pub fn with_reason_token(&self, reason: &str) -> Result<Self, Error> {
        let token = Token::new(reason)?;
        Ok(self.with_reason(ForwardedReason::from_token(token)?))
    }

    /// Returns a copy with a different status code.
    pub fn with_status_code(&self, status_code: Option<u16>) -> Result<Self, Error> {
        Self::try_new(self.reason, status_code, self.collapsed, self.stored)
    }

    /// Returns a copy with a different `collapsed` flag.
    pub fn with_collapsed(&self, collapsed: bool) -> Self {
        Self { collapsed, ..*self }
    }

    /// Returns a copy with a different `stored` flag.
    pub fn with_stored(&self, stored: bool) -> Self {
        Self { stored, ..*self }
    }

    /// Parameter values describing this forward, defaults included.
    ///
    /// Callers feed these through the schema, which drops the defaults.
    pub(crate) fn parameter_values(&self) -> impl Iterator<Item = (Parameter, BareItem)> {
        [
            Some((Parameter::Forward, BareItem::from(self.reason.to_token()))),
            self.status_code
                .map(|code| (Parameter::ForwardStatus, BareItem::Integer(i64::from(code)))),
            Some((Parameter::Collapsed, BareItem::Boolean(self.collapsed))),
            Some((Parameter::Stored, BareItem::Boolean(self.stored))),
        ]
        .into_iter()
        .flatten()
    }

    /// Renders the forward as a parameters fragment.
    ///
    /// `fwd` is always present; `fwd-status` is omitted when there is no
    /// status code, `collapsed` and `stored` are omitted when `false`.
    pub fn to_parameters(&self) -> Parameters {
        schema::assemble(self.parameter_values())
    }

    /// Reads a forward from a parameters fragment.
    ///
    /// Keys outside the Cache-Status vocabulary are rejected; recognized keys
    /// that do not belong to a forward (such as `ttl`) are ignored.
    pub fn from_parameters(parameters: &Parameters) -> Result<Self, Error> {
        let validated = ValidatedParameters::new(parameters)?;
        Self::from_validated(&validated, None)
    }

    /// Assembles a forward from checked parameters.
    ///
    /// An explicit `fwd-status` always wins over `default_status`.
    pub(crate) fn from_validated(
        parameters: &ValidatedParameters<'_>,
        default_status: Option<u16>,
    ) -> Result<Self, Error> {
        let reason = parameters
            .token(Parameter::Forward)
            .ok_or(Error::MissingReason)?;
        let reason = ForwardedReason::from_token(reason)?;
        let status_code = match parameters.integer(Parameter::ForwardStatus) {
            Some(code) => Some(check_status_code(code)?),
            None => default_status,
        };
        Self::try_new(
            reason,
            status_code,
            parameters.flag(Parameter::Collapsed),
            parameters.flag(Parameter::Stored),
        )
    }
}

impl From<ForwardedReason> for Forward {
    fn from(reason: ForwardedReason) -> Self {
        Self::new(reason)
    }
}
