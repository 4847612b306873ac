//! Shared identifiers and error plumbing for the recruitment portal.
//!
//! Everything above this crate (the platform-access library and the web
//! server) agrees on these types, so user ids look the same in the sealed
//! session cookie, in Postgres and in log lines.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{ParseIdError, UserId};
