#![warn(missing_docs)]
//! # cache-status-http
//!
//! Glue between [`cache_status`] values and the [`http`] crate.
//!
//! - [`CACHE_STATUS`] - the header name
//! - [`to_header_value`] / [`from_header_value`] - single value conversions
//! - [`CacheStatusHeaderExt`] - append and read the header on
//!   [`http::HeaderMap`] and [`http::Response`]
//!
//! When reading from a response, its status code is used as the default
//! `fwd-status` of forwarded members that omit one.

pub mod error;
pub mod header;

pub use error::Error;
pub use header::{CACHE_STATUS, CacheStatusHeaderExt, from_header_value, to_header_value};
