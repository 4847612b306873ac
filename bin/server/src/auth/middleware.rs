//! Role gate middleware for Axum.
//!
//! Protected route groups stack two layers:
//!
//! ```text
//! Router::new()
//!     .route(...)
//!     .route_layer(from_fn_with_state(Role::Admin, authorize))
//!     .route_layer(from_fn_with_state(app_state, authenticate))
//! ```
//!
//! The last `route_layer` is outermost, so `authenticate` runs first and
//! attaches the [`AuthContext`] that `authorize` checks.

use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use recruit_portal_platform_access::{AuthContext, AuthorizationError, Role};
use serde_json::json;

use super::cookie;

/// Reads the transport session and attaches it, plus the derived
/// [`AuthContext`], as request extensions. Never rejects.
pub async fn authenticate(jar: PrivateCookieJar, mut request: Request, next: Next) -> Response {
    let session = cookie::load(&jar);
    let context = AuthContext::from_session(&session);
    request.extensions_mut().insert(context);
    request.extensions_mut().insert(session);
    next.run(request).await
}

/// Lets the request through only if the attached context holds exactly the
/// `required` role.
pub async fn authorize(
    State(required): State<Role>,
    request: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let context = request
        .extensions()
        .get::<AuthContext>()
        .copied()
        .unwrap_or(AuthContext::Anonymous);

    match context.authorize(required) {
        Ok(_) => Ok(next.run(request).await),
        Err(err) => {
            tracing::debug!(
                path = %request.uri().path(),
                error = %err,
                "role gate rejected request"
            );
            Err(AuthRejection(err))
        }
    }
}

/// Rejection produced by [`authorize`].
#[derive(Debug)]
pub struct AuthRejection(pub AuthorizationError);

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            AuthorizationError::Unauthorized => (StatusCode::UNAUTHORIZED, "Not authenticated"),
            AuthorizationError::Forbidden { required, .. } => (
                StatusCode::FORBIDDEN,
                match required {
                    Role::Applicant => "Applicants only",
                    Role::Recruiter => "Recruiters only",
                    Role::Pending => "Pending recruiters only",
                    Role::Admin => "Admins only",
                },
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
