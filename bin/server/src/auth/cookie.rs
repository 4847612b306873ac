//! Sealed cookie carrying the [`TransportSession`].
//!
//! The cookie is encrypted and authenticated with the server's key, so its
//! contents are trusted as written by us. A cookie that fails to decrypt is
//! dropped by the jar; one that decrypts but does not parse is treated as an
//! empty session.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use recruit_portal_platform_access::TransportSession;
use time::Duration as TimeDuration;

use crate::config::SessionConfig;

/// Transport session cookie name.
pub const SESSION_COOKIE: &str = "recruit_session";

/// Reads the transport session from the jar.
pub fn load(jar: &PrivateCookieJar) -> TransportSession {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return TransportSession::new();
    };
    match serde_json::from_str(cookie.value()) {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(error = %e, "discarding unreadable session cookie");
            TransportSession::new()
        }
    }
}

/// Writes the transport session back to the jar. An empty session removes
/// the cookie instead.
pub fn store(
    jar: PrivateCookieJar,
    session: &TransportSession,
    config: &SessionConfig,
) -> Result<PrivateCookieJar, serde_json::Error> {
    if session.is_empty() {
        return Ok(clear(jar));
    }

    let value = serde_json::to_string(session)?;
    let cookie = Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(config.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(TimeDuration::seconds(config.max_age_seconds));

    Ok(jar.add(cookie))
}

/// Removes the transport session cookie.
pub fn clear(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}
