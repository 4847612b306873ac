//! Typed contents of the browser-bound transport session.
//!
//! The server seals this structure into a private cookie. Every field is
//! optional and read through an accessor returning `Option`, so a browser
//! that never logged in, or one whose cookie predates a field, is handled
//! without special cases.

use recruit_portal_core::UserId;
use serde::{Deserialize, Serialize};

use crate::role::{RequestedRole, Role};
use crate::user::User;

/// Per-browser session data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    requested_role: Option<RequestedRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    session_token: Option<String>,
    /// Only set for a recruiter provisioned as pending in this login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    logo_hint: Option<String>,
}

impl TransportSession {
    /// An empty (anonymous) session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the post-login session in one go, discarding whatever the
    /// browser held before (including any login state).
    #[must_use]
    pub fn authenticated(user: &User, session_token: String, logo_hint: Option<String>) -> Self {
        Self {
            state: None,
            requested_role: None,
            email: Some(user.email().to_string()),
            name: Some(user.name().to_string()),
            role: Some(user.role()),
            user_id: Some(user.id()),
            picture: user.picture().map(str::to_string),
            session_token: Some(session_token),
            logo_hint,
        }
    }

    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    #[must_use]
    pub fn requested_role(&self) -> Option<RequestedRole> {
        self.requested_role
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    #[must_use]
    pub fn picture(&self) -> Option<&str> {
        self.picture.as_deref()
    }

    #[must_use]
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    #[must_use]
    pub fn logo_hint(&self) -> Option<&str> {
        self.logo_hint.as_deref()
    }

    /// Records a login attempt's state token and role hint.
    pub fn begin_login(&mut self, state: String, requested_role: RequestedRole) {
        self.state = Some(state);
        self.requested_role = Some(requested_role);
    }

    /// Removes and returns the login attempt. The role hint defaults to
    /// applicant when none was recorded.
    pub fn take_login(&mut self) -> (Option<String>, RequestedRole) {
        let state = self.state.take();
        let requested = self.requested_role.take().unwrap_or_default();
        (state, requested)
    }

    /// Drops every field.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
