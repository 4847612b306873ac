//! Test doubles shared by the handler and service tests.

use async_trait::async_trait;
use axum::{
    http::header::SET_COOKIE,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use chrono::{DateTime, Utc};
use recruit_portal_core::{Result, UserId};
use recruit_portal_platform_access::{
    AccessToken, ExternalIdentity, IdentityProvider, MemorySessionStore, ProviderError, Session,
    SessionStore, SessionStoreError, TransportSession,
};
use std::collections::HashMap;

use crate::auth::cookie::{self, SESSION_COOKIE};
use crate::config::SessionConfig;

/// Cookie sealing secret used by tests.
pub fn test_session_config() -> SessionConfig {
    let mut config = SessionConfig::new("k".repeat(64));
    config.secure_cookies = false;
    config
}

/// `name=value` pair of a sealed transport session cookie.
pub fn session_cookie(key: &Key, session: &TransportSession) -> String {
    let jar = cookie::store(
        PrivateCookieJar::new(key.clone()),
        session,
        &test_session_config(),
    )
    .expect("seal session");
    set_cookie(&jar.into_response()).expect("cookie written")
}

/// `name=value` pair of the transport session cookie set by a response.
/// Removal cookies yield an empty value.
pub fn set_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.starts_with(&format!("{SESSION_COOKIE}=")))
        .map(str::to_string)
}

/// Decodes a JSON response body.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Identity with a name derived from the email's local part.
pub fn identity(email: &str) -> ExternalIdentity {
    let local = email.split('@').next().unwrap_or(email);
    ExternalIdentity::new(format!("sub-{local}"), email).with_name(local)
}

/// Provider that maps each authorization code to a fixed identity.
///
/// Unknown codes fail the exchange.
#[derive(Default)]
pub struct FakeProvider {
    identities: HashMap<String, ExternalIdentity>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, code: &str, identity: ExternalIdentity) -> Self {
        self.identities.insert(code.to_string(), identity);
        self
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    fn authorization_url(&self, state: &str) -> String {
        format!("https://provider.test/auth?state={state}")
    }

    async fn exchange(&self, code: &str) -> Result<AccessToken, ProviderError> {
        if self.identities.contains_key(code) {
            Ok(AccessToken::new(code.to_string()))
        } else {
            Err(ProviderError::ExchangeFailed {
                reason: "invalid_grant".to_string(),
            }
            .into())
        }
    }

    async fn fetch_profile(&self, token: &AccessToken) -> Result<ExternalIdentity, ProviderError> {
        self.identities.get(token.secret()).cloned().ok_or_else(|| {
            ProviderError::ProfileFetchFailed {
                reason: "unknown token".to_string(),
            }
            .into()
        })
    }
}

/// Session store whose deletes always fail.
#[derive(Default)]
pub struct FlakySessionStore {
    inner: MemorySessionStore,
}

impl FlakySessionStore {
    pub fn failing_deletes() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for FlakySessionStore {
    async fn upsert(&self, session: &Session) -> Result<(), SessionStoreError> {
        self.inner.upsert(session).await
    }

    async fn delete(&self, _user_id: UserId, _token: &str) -> Result<bool, SessionStoreError> {
        Err(SessionStoreError::WriteFailed {
            details: "connection reset".to_string(),
        }
        .into())
    }

    async fn delete_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, SessionStoreError> {
        self.inner.delete_created_before(cutoff).await
    }
}
