//! Durable, revocable session records.
//!
//! A session row is keyed by its owning user: issuing a new session for a
//! user replaces the previous token, so each user holds zero or one valid
//! token at a time. The transport cookie carries a copy of the token; the
//! row is what logout and the sweeper act on.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use recruit_portal_core::{Result, UserId};
use serde::{Deserialize, Serialize};

use crate::error::SessionStoreError;
use crate::token::generate_token;

/// One durable session row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user_id: UserId,
    token: String,
    created_at: DateTime<Utc>,
}

impl Session {
    /// Creates a session for `user_id` with a freshly generated token.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self::with_token(user_id, generate_token(), Utc::now())
    }

    /// Reconstitutes a session from storage.
    #[must_use]
    pub fn with_token(user_id: UserId, token: String, created_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            token,
            created_at,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns true if the session was created more than `max_age` ago.
    #[must_use]
    pub fn is_older_than(&self, max_age: Duration) -> bool {
        Utc::now() - self.created_at > max_age
    }
}

/// Storage for session rows.
///
/// Implementors provide the three primitive operations; `issue`, `revoke`
/// and `sweep` are built on top of them.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Inserts the row, replacing any existing row for the same user.
    async fn upsert(&self, session: &Session) -> Result<(), SessionStoreError>;

    /// Deletes the row matching both fields. Returns whether a row was removed.
    async fn delete(&self, user_id: UserId, token: &str) -> Result<bool, SessionStoreError>;

    /// Deletes rows created before `cutoff`. Returns the number removed.
    async fn delete_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, SessionStoreError>;

    /// Issues a new token for `user_id`, superseding any previous one.
    async fn issue(&self, user_id: UserId) -> Result<String, SessionStoreError> {
        let session = Session::new(user_id);
        self.upsert(&session).await?;
        tracing::debug!(user_id = %user_id, "issued session");
        Ok(session.token)
    }

    /// Revokes a token. A missing or already-superseded row is not an error.
    async fn revoke(&self, user_id: UserId, token: &str) -> Result<(), SessionStoreError> {
        if !self.delete(user_id, token).await? {
            tracing::debug!(user_id = %user_id, "no live session matched on revoke");
        }
        Ok(())
    }

    /// Removes every session older than `max_age`.
    async fn sweep(&self, max_age: Duration) -> Result<u64, SessionStoreError> {
        self.delete_created_before(Utc::now() - max_age).await
    }
}
