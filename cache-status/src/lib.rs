#![warn(missing_docs)]
//! # cache-status
//!
//! Typed values for the RFC 9211 `Cache-Status` HTTP response header.
//!
//! Caches, CDNs and proxies use `Cache-Status` to report, one member per
//! intermediary, whether a request was served from cache or forwarded
//! upstream, and why. This crate gives producers a way to build such a
//! member that cannot violate the header's rules, and gives consumers a
//! validated parse into the same type.
//!
//! ## Types
//!
//! - [`HandledRequestCache`] - one cache's report (`"cache-01";hit;ttl=30`)
//! - [`Forward`] - why and how the request went forward (`fwd`, `fwd-status`, ...)
//! - [`ForwardedReason`] - the closed vocabulary of `fwd` tokens
//! - [`Token`] / [`TokenOrString`] - structured field text values
//! - [`schema`] - the parameter table shared by encoding and decoding
//!
//! Parsing and rendering of the structured field grammar (RFC 8941) is
//! delegated to the [`sfv`] crate.
//!
//! ## Example
//!
//! ```
//! use cache_status::{Forward, ForwardedReason, HandledRequestCache};
//!
//! let status = HandledRequestCache::served_by_token("ExampleCDN")?
//!     .was_forwarded(Forward::new(ForwardedReason::UriMiss).with_stored(true))?;
//!
//! let wire = status.to_wire_value()?;
//! assert_eq!(wire, "ExampleCDN;fwd=uri-miss;stored");
//! assert_eq!(wire.parse::<HandledRequestCache>()?, status);
//! # Ok::<(), cache_status::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod forward;
pub mod handled;
pub mod reason;
pub mod schema;
pub mod token;

pub use config::{CacheStatusConfig, IdentifierKind};
pub use error::Error;
pub use forward::Forward;
pub use handled::HandledRequestCache;
pub use reason::ForwardedReason;
pub use schema::{Parameter, ValueKind};
pub use token::{Token, TokenOrString};

#[doc(hidden)]
pub use sfv;
