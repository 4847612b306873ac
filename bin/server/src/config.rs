//! Centralized server configuration.
//!
//! This module provides strongly-typed configuration for the server,
//! loaded via the `config` crate from environment variables. Nested keys use
//! `__` as the separator, e.g. `SESSION__SECRET` or `REDIRECTS__ADMIN`.
//!
//! See [`OAuthConfig`](recruit_portal_platform_access::OAuthConfig) for the
//! identity provider settings (`OAUTH__CLIENT_ID`, ...).

use axum_extra::extract::cookie::Key;
use recruit_portal_platform_access::{OAuthConfig, Role};
use serde::Deserialize;
use std::fmt;

/// Server configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// PostgreSQL database connection URL.
    pub database_url: String,

    /// Socket address to listen on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Transport and durable session configuration.
    pub session: SessionConfig,

    /// OAuth identity provider configuration.
    pub oauth: OAuthConfig,

    /// Where each role lands after login, and where logout goes.
    #[serde(default)]
    pub redirects: RedirectConfig,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

/// Session-related configuration.
#[derive(Clone, Deserialize)]
pub struct SessionConfig {
    /// Secret sealing the session cookie. At least 64 bytes.
    pub secret: String,

    /// Lifetime of the session cookie and of durable session rows, in seconds.
    #[serde(default = "default_max_age_seconds")]
    pub max_age_seconds: i64,

    /// Interval between session sweeps, in seconds.
    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,

    /// Whether to set the Secure flag on cookies (requires HTTPS).
    /// Defaults to true for production safety; set to false for local HTTP development.
    #[serde(default = "default_secure_cookies")]
    pub secure_cookies: bool,
}

fn default_max_age_seconds() -> i64 {
    86_400
}

fn default_cleanup_interval_seconds() -> u64 {
    300
}

fn default_secure_cookies() -> bool {
    true
}

impl SessionConfig {
    /// Creates a configuration with default lifetimes.
    #[must_use]
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            max_age_seconds: default_max_age_seconds(),
            cleanup_interval_seconds: default_cleanup_interval_seconds(),
            secure_cookies: default_secure_cookies(),
        }
    }

    /// Derives the cookie sealing key from the configured secret.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is shorter than 64 bytes.
    pub fn cookie_key(&self) -> Result<Key, config::ConfigError> {
        Key::try_from(self.secret.as_bytes()).map_err(|e| {
            config::ConfigError::Message(format!("session.secret is unusable: {e}"))
        })
    }

    /// Rejects lifetimes that would panic once the server is running.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive or unrepresentable maximum age, or
    /// a zero sweep interval.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let representable = chrono::Duration::try_seconds(self.max_age_seconds)
            .and_then(|age| chrono::Utc::now().checked_sub_signed(age))
            .is_some();
        if self.max_age_seconds <= 0 || !representable {
            return Err(config::ConfigError::Message(format!(
                "session.max_age_seconds out of range: {}",
                self.max_age_seconds
            )));
        }
        if self.cleanup_interval_seconds == 0 {
            return Err(config::ConfigError::Message(
                "session.cleanup_interval_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Maximum session age as a chrono duration.
    #[must_use]
    pub fn max_age(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.max_age_seconds)
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"[redacted]")
            .field("max_age_seconds", &self.max_age_seconds)
            .field("cleanup_interval_seconds", &self.cleanup_interval_seconds)
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

/// Post-login landing pages and logout target.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedirectConfig {
    pub applicant: String,
    pub recruiter: String,
    /// Newly signed-up recruiters continue with company onboarding.
    pub pending: String,
    pub admin: String,
    pub logout: String,
    /// Target when a login is refused by policy.
    pub home: String,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            applicant: "/applicant/dashboard".to_string(),
            recruiter: "/recruiter/dashboard".to_string(),
            pending: "/recruiter/onboarding".to_string(),
            admin: "/admin/dashboard".to_string(),
            logout: "/".to_string(),
            home: "/".to_string(),
        }
    }
}

impl RedirectConfig {
    /// Landing URL for a freshly authenticated user.
    #[must_use]
    pub fn landing_for(&self, role: Role) -> &str {
        match role {
            Role::Applicant => &self.applicant,
            Role::Recruiter => &self.recruiter,
            Role::Pending => &self.pending,
            Role::Admin => &self.admin,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(config::Environment::default())
    }

    /// Loads configuration from the given environment source.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_source(environment: config::Environment) -> Result<Self, config::ConfigError> {
        let config: Self = config::Config::builder()
            .add_source(environment.separator("__").try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.session.validate()?;
        Ok(config)
    }
}
