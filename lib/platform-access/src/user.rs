//! User domain type.
//!
//! Users are keyed by email for provisioning and by [`UserId`] everywhere
//! else. The role is the only field the core mutates after creation.

use chrono::{DateTime, Utc};
use recruit_portal_core::UserId;
use serde::{Deserialize, Serialize};

use crate::identity::ExternalIdentity;
use crate::role::Role;

/// A portal user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    /// Unique across all users.
    email: String,
    picture: Option<String>,
    role: Role,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a brand-new user from a provider identity.
    ///
    /// Name, email and picture are copied from the identity; a missing
    /// picture stays `None`.
    #[must_use]
    pub fn from_identity(identity: &ExternalIdentity, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            name: identity.display_name(),
            email: identity.email.clone(),
            picture: identity.picture().map(str::to_string),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitutes a user from storage.
    #[must_use]
    pub fn with_all_fields(
        id: UserId,
        name: String,
        email: String,
        picture: Option<String>,
        role: Role,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            picture,
            role,
            created_at,
            updated_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn picture(&self) -> Option<&str> {
        self.picture.as_deref()
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Changes the role and bumps `updated_at`.
    pub fn set_role(&mut self, role: Role) {
        self.role = role;
        self.updated_at = Utc::now();
    }
}
