//! OAuth2 provider configuration.
//!
//! The endpoints default to Google's; tests and other deployments can point
//! them elsewhere. Fields with defaults can be omitted when loading from
//! environment variables.

use serde::{Deserialize, Serialize};

/// Connection settings for the OAuth2 identity provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// The OAuth2 client ID registered with the provider.
    client_id: String,
    /// The OAuth2 client secret.
    client_secret: String,
    /// Callback URL registered with the provider
    /// (e.g. "https://portal.example.com/auth/callback").
    redirect_url: String,
    #[serde(default = "default_auth_url")]
    auth_url: String,
    #[serde(default = "default_token_url")]
    token_url: String,
    #[serde(default = "default_userinfo_url")]
    userinfo_url: String,
    /// Comma-separated scopes.
    #[serde(default = "default_scopes")]
    scopes: String,
}

fn default_auth_url() -> String {
    "https://accounts.google.com/o/oauth2/v2/auth".to_string()
}

fn default_token_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_userinfo_url() -> String {
    "https://www.googleapis.com/oauth2/v3/userinfo".to_string()
}

fn default_scopes() -> String {
    "https://www.googleapis.com/auth/userinfo.email,https://www.googleapis.com/auth/userinfo.profile"
        .to_string()
}

impl OAuthConfig {
    /// Creates a configuration with the default (Google) endpoints.
    #[must_use]
    pub fn new(client_id: String, client_secret: String, redirect_url: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_url,
            auth_url: default_auth_url(),
            token_url: default_token_url(),
            userinfo_url: default_userinfo_url(),
            scopes: default_scopes(),
        }
    }

    /// Points the configuration at different provider endpoints.
    #[must_use]
    pub fn with_endpoints(
        mut self,
        auth_url: impl Into<String>,
        token_url: impl Into<String>,
        userinfo_url: impl Into<String>,
    ) -> Self {
        self.auth_url = auth_url.into();
        self.token_url = token_url.into();
        self.userinfo_url = userinfo_url.into();
        self
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    #[must_use]
    pub fn redirect_url(&self) -> &str {
        &self.redirect_url
    }

    #[must_use]
    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    #[must_use]
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    #[must_use]
    pub fn userinfo_url(&self) -> &str {
        &self.userinfo_url
    }

    /// Returns the scopes to request, parsed from the comma-separated string.
    #[must_use]
    pub fn scopes(&self) -> Vec<&str> {
        self.scopes
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("redirect_url", &self.redirect_url)
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("userinfo_url", &self.userinfo_url)
            .field("scopes", &self.scopes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_google() {
        let config = OAuthConfig::new(
            "id".to_string(),
            "secret".to_string(),
            "http://localhost:8080/auth/callback".to_string(),
        );
        assert!(config.auth_url().starts_with("https://accounts.google.com/"));
        assert_eq!(config.scopes().len(), 2);
        assert!(config.scopes()[0].ends_with("userinfo.email"));
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{
            "client_id": "id",
            "client_secret": "secret",
            "redirect_url": "http://localhost/cb",
            "scopes": "email, profile,"
        }"#;
        let config: OAuthConfig = serde_json::from_str(json).expect("deserialize");
        assert_eq!(config.token_url(), "https://oauth2.googleapis.com/token");
        assert_eq!(config.scopes(), vec!["email", "profile"]);
    }

    #[test]
    fn debug_hides_secret() {
        let config = OAuthConfig::new("id".into(), "hunter2".into(), "http://x/cb".into());
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
