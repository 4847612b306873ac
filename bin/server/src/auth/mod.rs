//! Authentication module for the recruitment portal server.
//!
//! This module provides:
//! - Google OAuth login with a single-use state token
//! - The sealed cookie transport session
//! - Postgres-backed users and durable sessions
//! - The two-stage role gate for Axum route groups
//!
//! # Authorization Model
//!
//! Every user holds exactly one role, recorded in the transport session at
//! login. The gate compares that role against the route group's required
//! role and nothing else: role changes made by an admin take effect on the
//! user's next login.

pub mod cookie;
pub mod db;
pub mod error;
pub mod google;
pub mod middleware;
pub mod routes;
pub mod service;
pub mod sweeper;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use std::sync::Arc;

use crate::config::SessionConfig;

pub use error::AuthError;
pub use google::GoogleOAuthClient;
pub use middleware::{AuthRejection, authenticate, authorize};
pub use routes::{callback, login, login_as, logout};
pub use service::{AuthService, CallbackOutcome, CallbackParams};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Login, callback and logout orchestration.
    pub auth: Arc<AuthService>,
    /// Key sealing the transport session cookie.
    pub cookie_key: Key,
    /// Session configuration.
    pub session_config: Arc<SessionConfig>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(auth: AuthService, cookie_key: Key, session_config: SessionConfig) -> Self {
        Self {
            auth: Arc::new(auth),
            cookie_key,
            session_config: Arc::new(session_config),
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
