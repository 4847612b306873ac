//! Error types for the platform-access crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `AuthenticationError`: failures while establishing who the caller is
//! - `ProviderError`: identity provider round trips
//! - `DirectoryError`: user lookup, provisioning and role transitions
//! - `SessionStoreError`: durable session persistence
//! - `AuthorizationError`: role gate rejections

use crate::role::Role;
use recruit_portal_core::UserId;
use std::fmt;

/// Errors from the login/callback handshake itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    /// The callback's state parameter did not match the issued token, or no
    /// token was issued for this browser.
    InvalidState,
}

impl fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState => write!(f, "login state token missing or mismatched"),
        }
    }
}

impl std::error::Error for AuthenticationError {}

/// Errors from the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The authorization code could not be exchanged for an access token.
    ExchangeFailed { reason: String },
    /// The userinfo request failed or returned an unreadable profile.
    ProfileFetchFailed { reason: String },
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExchangeFailed { reason } => {
                write!(f, "authorization code exchange failed: {reason}")
            }
            Self::ProfileFetchFailed { reason } => {
                write!(f, "profile fetch failed: {reason}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Errors from the user directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// A new admin account was requested through self-service signup.
    AdminSelfSignupBlocked { email: String },
    /// Reading from the user store failed.
    ReadFailed { details: String },
    /// Writing to the user store failed.
    WriteFailed { details: String },
    /// The user does not exist.
    UserNotFound { user_id: UserId },
    /// A role transition required a pending user.
    NotPending { user_id: UserId, role: Role },
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdminSelfSignupBlocked { email } => {
                write!(f, "admin self-signup blocked for {email}")
            }
            Self::ReadFailed { details } => write!(f, "user directory read failed: {details}"),
            Self::WriteFailed { details } => write!(f, "user directory write failed: {details}"),
            Self::UserNotFound { user_id } => write!(f, "user {user_id} not found"),
            Self::NotPending { user_id, role } => {
                write!(f, "user {user_id} is {role}, not pending")
            }
        }
    }
}

impl std::error::Error for DirectoryError {}

/// Errors from the durable session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStoreError {
    /// Persisting or deleting a session row failed.
    WriteFailed { details: String },
}

impl fmt::Display for SessionStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteFailed { details } => write!(f, "session store write failed: {details}"),
        }
    }
}

impl std::error::Error for SessionStoreError {}

/// Rejections produced by the role gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    /// No role is attached to the request.
    Unauthorized,
    /// The attached role is not the one the route requires.
    Forbidden { required: Role, actual: Role },
}

impl fmt::Display for AuthorizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "user is not authenticated"),
            Self::Forbidden { required, actual } => {
                write!(f, "route requires role {required}, caller is {actual}")
            }
        }
    }
}

impl std::error::Error for AuthorizationError {}
