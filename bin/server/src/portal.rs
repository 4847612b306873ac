//! Portal endpoints behind (and in front of) the role gate.
//!
//! Page rendering lives elsewhere; these handlers expose the caller's
//! session view as JSON and carry out the admin role transitions.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use recruit_portal_core::UserId;
use recruit_portal_platform_access::{DirectoryError, Role, TransportSession, User};
use rootcause::Report;
use serde::Serialize;
use serde_json::json;
use std::str::FromStr;

use crate::auth::{AppState, cookie};

/// User info for display, read from the transport session.
#[derive(Clone, Debug, Serialize)]
pub struct CurrentUser {
    pub user_id: Option<UserId>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Role,
    pub picture: Option<String>,
}

impl CurrentUser {
    fn from_session(session: &TransportSession) -> Option<Self> {
        Some(Self {
            user_id: session.user_id(),
            name: session.name().map(str::to_string),
            email: session.email().map(str::to_string),
            role: session.role()?,
            picture: session.picture().map(str::to_string),
        })
    }
}

/// Current user summary, or `null` when signed out.
pub async fn home(jar: PrivateCookieJar) -> Json<Option<CurrentUser>> {
    Json(CurrentUser::from_session(&cookie::load(&jar)))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Dashboard view shared by every gated group. The gate has already
/// checked the role.
pub async fn dashboard(Extension(session): Extension<TransportSession>) -> Response {
    match CurrentUser::from_session(&session) {
        Some(user) => Json(user).into_response(),
        None => StatusCode::UNAUTHORIZED.into_response(),
    }
}

/// Company onboarding handoff for a freshly signed-up recruiter.
pub async fn onboarding(
    Extension(session): Extension<TransportSession>,
) -> Json<serde_json::Value> {
    Json(json!({
        "user_id": session.user_id(),
        "logo_hint": session.logo_hint(),
    }))
}

/// Withdraws the caller's own pending signup and logs them out. The user
/// comes from the session, never from the request.
pub async fn cancel_onboarding(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Extension(mut session): Extension<TransportSession>,
) -> Result<(PrivateCookieJar, Redirect), PortalError> {
    let user_id = session.user_id().ok_or(PortalError::NotSignedIn)?;
    let target = state
        .auth
        .cancel_signup(user_id, &mut session)
        .await?
        .to_string();
    Ok((cookie::clear(jar), Redirect::to(&target)))
}

/// Every user, for the admin user list.
pub async fn all_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, PortalError> {
    let users = state.auth.directory().all_users().await?;
    Ok(Json(users))
}

/// Recruiters waiting for approval.
pub async fn pending_recruiters(
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, PortalError> {
    let users = state.auth.directory().pending_recruiters().await?;
    Ok(Json(users))
}

pub async fn approve_recruiter(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, PortalError> {
    let id = parse_user_id(&id)?;
    state.auth.directory().approve(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reject_recruiter(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, PortalError> {
    let id = parse_user_id(&id)?;
    state.auth.directory().reject(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_user_id(raw: &str) -> Result<UserId, PortalError> {
    UserId::from_str(raw).map_err(|_| PortalError::InvalidUserId(raw.to_string()))
}

/// Errors from the portal endpoints.
#[derive(Debug)]
pub enum PortalError {
    NotSignedIn,
    InvalidUserId(String),
    Directory(Report<DirectoryError>),
}

impl From<Report<DirectoryError>> for PortalError {
    fn from(report: Report<DirectoryError>) -> Self {
        Self::Directory(report)
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotSignedIn => (StatusCode::UNAUTHORIZED, "Not authenticated"),
            Self::InvalidUserId(_) => (StatusCode::BAD_REQUEST, "Invalid user id"),
            Self::Directory(report) => match report.current_context() {
                DirectoryError::UserNotFound { .. } => (StatusCode::NOT_FOUND, "User not found"),
                DirectoryError::NotPending { .. } => {
                    (StatusCode::CONFLICT, "User is not awaiting approval")
                }
                _ => {
                    tracing::error!(error = %report, "user directory error");
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                }
            },
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
