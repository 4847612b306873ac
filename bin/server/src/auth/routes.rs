//! Authentication routes for login, callback, and logout.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use recruit_portal_platform_access::RequestedRole;

use super::{
    AppState,
    cookie,
    error::AuthError,
    service::{CallbackOutcome, CallbackParams},
};

/// Starts an applicant login (the default role hint).
pub async fn login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> Result<impl IntoResponse, AuthError> {
    start_login(&state, jar, RequestedRole::Applicant)
}

/// Starts a login carrying a role hint from the path. Unknown hints fall
/// back to applicant.
pub async fn login_as(
    State(state): State<AppState>,
    Path(role): Path<String>,
    jar: PrivateCookieJar,
) -> Result<impl IntoResponse, AuthError> {
    start_login(&state, jar, RequestedRole::from_hint(Some(&role)))
}

fn start_login(
    state: &AppState,
    jar: PrivateCookieJar,
    requested: RequestedRole,
) -> Result<(PrivateCookieJar, Redirect), AuthError> {
    let mut session = cookie::load(&jar);
    let auth_url = state.auth.login(&mut session, requested);
    let jar = cookie::store(jar, &session, &state.session_config)?;
    Ok((jar, Redirect::to(&auth_url)))
}

/// Handles the provider redirect back to us.
///
/// The session is written back whatever the outcome, since validation has
/// already consumed its state token.
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
    jar: PrivateCookieJar,
) -> Response {
    let mut session = cookie::load(&jar);
    let outcome = state.auth.callback(&mut session, &params).await;

    let jar = match cookie::store(jar, &session, &state.session_config) {
        Ok(jar) => jar,
        Err(e) => return AuthError::from(e).into_response(),
    };

    match outcome {
        Ok(CallbackOutcome::SignedIn { landing_url, .. }) => {
            (jar, Redirect::to(&landing_url)).into_response()
        }
        Ok(CallbackOutcome::SignupBlocked { home_url }) => {
            (jar, Redirect::to(&home_url)).into_response()
        }
        Err(e) => (jar, e).into_response(),
    }
}

/// Logs out: revokes the durable session and drops the cookie.
pub async fn logout(State(state): State<AppState>, jar: PrivateCookieJar) -> impl IntoResponse {
    let mut session = cookie::load(&jar);
    let target = state.auth.logout(&mut session).await.to_string();
    (cookie::clear(jar), Redirect::to(&target))
}
