//! HTTP mapping of authentication failures.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use recruit_portal_platform_access::{
    AuthenticationError, DirectoryError, ProviderError, SessionStoreError,
};
use rootcause::Report;
use serde_json::json;

/// Errors surfaced by the login and callback handlers.
#[derive(Debug)]
pub enum AuthError {
    /// State token missing or mismatched.
    InvalidState,
    /// Code exchange with the provider failed.
    ExchangeFailed(String),
    /// Profile fetch from the provider failed.
    ProfileFetchFailed(String),
    /// User lookup or provisioning failed.
    Directory(String),
    /// Session issuance failed.
    SessionStore(String),
    /// The sealed cookie could not be written.
    TransportSession(String),
}

impl From<AuthenticationError> for AuthError {
    fn from(err: AuthenticationError) -> Self {
        match err {
            AuthenticationError::InvalidState => Self::InvalidState,
        }
    }
}

impl From<Report<ProviderError>> for AuthError {
    fn from(report: Report<ProviderError>) -> Self {
        match report.current_context() {
            ProviderError::ExchangeFailed { .. } => Self::ExchangeFailed(report.to_string()),
            ProviderError::ProfileFetchFailed { .. } => {
                Self::ProfileFetchFailed(report.to_string())
            }
        }
    }
}

impl From<Report<DirectoryError>> for AuthError {
    fn from(report: Report<DirectoryError>) -> Self {
        Self::Directory(report.to_string())
    }
}

impl From<Report<SessionStoreError>> for AuthError {
    fn from(report: Report<SessionStoreError>) -> Self {
        Self::SessionStore(report.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        Self::TransportSession(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::InvalidState => (StatusCode::UNAUTHORIZED, "Invalid login state"),
            Self::ExchangeFailed(msg) => {
                tracing::error!(error = %msg, "token exchange failed");
                (StatusCode::BAD_GATEWAY, "Authentication failed")
            }
            Self::ProfileFetchFailed(msg) => {
                tracing::error!(error = %msg, "profile fetch failed");
                (StatusCode::BAD_GATEWAY, "Authentication failed")
            }
            Self::Directory(msg) => {
                tracing::error!(error = %msg, "user directory error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            Self::SessionStore(msg) => {
                tracing::error!(error = %msg, "session store error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            Self::TransportSession(msg) => {
                tracing::error!(error = %msg, "failed to seal session cookie");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
