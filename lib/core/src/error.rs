//! Result alias shared by the portal crates.
//!
//! Library crates keep their own domain error enums and wrap them in a
//! rootcause [`Report`] so callers can attach context on the way up.

use rootcause::Report;

/// A Result type alias using rootcause's Report for error handling.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;
