//! In-process stores.
//!
//! Test doubles for the persistence traits. Each store holds its rows
//! behind a single mutex, which makes every trait operation atomic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recruit_portal_core::{Result, UserId};
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::directory::UserStore;
use crate::error::{DirectoryError, SessionStoreError};
use crate::role::Role;
use crate::session::{Session, SessionStore};
use crate::user::User;

/// [`UserStore`] backed by a map.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<UserId, User>>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.lock().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DirectoryError> {
        let users = self.users.lock().await;
        Ok(users.values().find(|u| u.email() == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DirectoryError> {
        Ok(self.users.lock().await.get(&id).cloned())
    }

    async fn insert_if_absent(&self, user: &User) -> Result<bool, DirectoryError> {
        let mut users = self.users.lock().await;
        if users.values().any(|u| u.email() == user.email()) {
            return Ok(false);
        }
        users.insert(user.id(), user.clone());
        Ok(true)
    }

    async fn update_role_if(
        &self,
        id: UserId,
        from: Role,
        to: Role,
    ) -> Result<bool, DirectoryError> {
        let mut users = self.users.lock().await;
        match users.get_mut(&id) {
            Some(user) if user.role() == from => {
                user.set_role(to);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_if_role(&self, id: UserId, role: Role) -> Result<bool, DirectoryError> {
        let mut users = self.users.lock().await;
        if users.get(&id).is_some_and(|u| u.role() == role) {
            users.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, DirectoryError> {
        let users = self.users.lock().await;
        let mut matching: Vec<User> = users
            .values()
            .filter(|u| u.role() == role)
            .cloned()
            .collect();
        matching.sort_by_key(User::created_at);
        Ok(matching)
    }

    async fn list_all(&self) -> Result<Vec<User>, DirectoryError> {
        let mut all: Vec<User> = self.users.lock().await.values().cloned().collect();
        all.sort_by_key(User::created_at);
        Ok(all)
    }
}

/// [`SessionStore`] backed by a map keyed by user.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<UserId, Session>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live rows.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// The live row for a user, if any.
    pub async fn get(&self, user_id: UserId) -> Option<Session> {
        self.sessions.lock().await.get(&user_id).cloned()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn upsert(&self, session: &Session) -> Result<(), SessionStoreError> {
        self.sessions
            .lock()
            .await
            .insert(session.user_id(), session.clone());
        Ok(())
    }

    async fn delete(&self, user_id: UserId, token: &str) -> Result<bool, SessionStoreError> {
        let mut sessions = self.sessions.lock().await;
        if sessions.get(&user_id).is_some_and(|s| s.token() == token) {
            sessions.remove(&user_id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn delete_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, SessionStoreError> {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.created_at() >= cutoff);
        Ok((before - sessions.len()) as u64)
    }
}
