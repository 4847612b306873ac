//! Identity provider seam.

use async_trait::async_trait;
use recruit_portal_core::Result;
use std::fmt;

use crate::error::ProviderError;
use crate::identity::ExternalIdentity;

/// Access token returned by the authorization-code exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    #[must_use]
    pub fn new(secret: String) -> Self {
        Self(secret)
    }

    #[must_use]
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([redacted])")
    }
}

/// An OAuth2 identity provider.
///
/// Each method performs at most one outbound round trip and never retries.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// URL of the provider's consent screen carrying `state`.
    fn authorization_url(&self, state: &str) -> String;

    /// Exchanges an authorization code for an access token.
    async fn exchange(&self, code: &str) -> Result<AccessToken, ProviderError>;

    /// Fetches the profile of the user the token belongs to.
    async fn fetch_profile(&self, token: &AccessToken)
    -> Result<ExternalIdentity, ProviderError>;
}
