//! Google OAuth 2.0 identity provider.
//!
//! Plain authorization-code flow: the consent URL carries our state token,
//! the callback's code is exchanged for an access token, and the profile is
//! read from the userinfo endpoint with that token.

use async_trait::async_trait;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    RedirectUrl, RequestTokenError, Scope, TokenResponse, TokenUrl, basic::BasicClient,
};
use recruit_portal_core::Result;
use recruit_portal_platform_access::{
    AccessToken, ExternalIdentity, IdentityProvider, OAuthConfig, ProviderError,
};
use std::fmt;
use tracing::instrument;

/// OAuth client with the authorization and token endpoints configured.
type ConfiguredClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Google identity provider client.
#[derive(Clone)]
pub struct GoogleOAuthClient {
    client: ConfiguredClient,
    http: reqwest::Client,
    userinfo_url: String,
    scopes: Vec<Scope>,
}

impl GoogleOAuthClient {
    /// Builds the client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &OAuthConfig) -> std::result::Result<Self, GoogleClientError> {
        let auth_url = AuthUrl::new(config.auth_url().to_string())
            .map_err(|e| GoogleClientError::invalid_url("auth_url", e))?;
        let token_url = TokenUrl::new(config.token_url().to_string())
            .map_err(|e| GoogleClientError::invalid_url("token_url", e))?;
        let redirect_url = RedirectUrl::new(config.redirect_url().to_string())
            .map_err(|e| GoogleClientError::invalid_url("redirect_url", e))?;

        let client = BasicClient::new(ClientId::new(config.client_id().to_string()))
            .set_client_secret(ClientSecret::new(config.client_secret().to_string()))
            .set_auth_uri(auth_url)
            .set_token_uri(token_url)
            .set_redirect_uri(redirect_url);

        // Following redirects from the token endpoint would leak the code.
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| GoogleClientError::HttpClient {
                details: e.to_string(),
            })?;

        Ok(Self {
            client,
            http,
            userinfo_url: config.userinfo_url().to_string(),
            scopes: config
                .scopes()
                .into_iter()
                .map(|s| Scope::new(s.to_string()))
                .collect(),
        })
    }
}

#[async_trait]
impl IdentityProvider for GoogleOAuthClient {
    fn authorization_url(&self, state: &str) -> String {
        let state = state.to_string();
        let (url, _) = self
            .client
            .authorize_url(move || CsrfToken::new(state))
            .add_scopes(self.scopes.iter().cloned())
            .url();
        url.to_string()
    }

    #[instrument(skip_all)]
    async fn exchange(&self, code: &str) -> Result<AccessToken, ProviderError> {
        let response = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http)
            .await
            .map_err(|e| ProviderError::ExchangeFailed {
                reason: match e {
                    RequestTokenError::ServerResponse(response) => response.to_string(),
                    other => other.to_string(),
                },
            })?;

        Ok(AccessToken::new(response.access_token().secret().clone()))
    }

    #[instrument(skip_all)]
    async fn fetch_profile(&self, token: &AccessToken) -> Result<ExternalIdentity, ProviderError> {
        let identity = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(token.secret())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ProviderError::ProfileFetchFailed {
                reason: e.to_string(),
            })?
            .json::<ExternalIdentity>()
            .await
            .map_err(|e| ProviderError::ProfileFetchFailed {
                reason: format!("malformed userinfo document: {e}"),
            })?;

        tracing::debug!(subject = %identity.subject, "fetched provider profile");
        Ok(identity)
    }
}

/// Errors building a [`GoogleOAuthClient`].
#[derive(Debug)]
pub enum GoogleClientError {
    /// A configured endpoint is not a valid URL.
    InvalidUrl { field: &'static str, details: String },
    /// The outbound HTTP client could not be created.
    HttpClient { details: String },
}

impl GoogleClientError {
    fn invalid_url(field: &'static str, err: impl fmt::Display) -> Self {
        Self::InvalidUrl {
            field,
            details: err.to_string(),
        }
    }
}

impl fmt::Display for GoogleClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl { field, details } => write!(f, "invalid oauth.{field}: {details}"),
            Self::HttpClient { details } => write!(f, "failed to build HTTP client: {details}"),
        }
    }
}

impl std::error::Error for GoogleClientError {}
