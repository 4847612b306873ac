//! Login, callback and logout orchestration.

use recruit_portal_core::UserId;
use recruit_portal_platform_access::{
    DirectoryError, IdentityProvider, RequestedRole, Role, SessionStore, StateTokenGuard,
    TransportSession, User, UserDirectory,
};
use rootcause::Report;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::error::AuthError;
use crate::config::RedirectConfig;

/// Query parameters the provider appends to the callback URL.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set by the provider when the user declined consent.
    pub error: Option<String>,
}

/// How a callback that passed state validation ended.
#[derive(Debug)]
pub enum CallbackOutcome {
    /// The transport session now holds the user; send them to their landing page.
    SignedIn { user: User, landing_url: String },
    /// An unknown email asked for admin. Nothing was created.
    SignupBlocked { home_url: String },
}

/// Ties the state guard, provider, directory and session store together.
pub struct AuthService {
    provider: Arc<dyn IdentityProvider>,
    directory: UserDirectory,
    sessions: Arc<dyn SessionStore>,
    redirects: RedirectConfig,
}

impl AuthService {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        directory: UserDirectory,
        sessions: Arc<dyn SessionStore>,
        redirects: RedirectConfig,
    ) -> Self {
        Self {
            provider,
            directory,
            sessions,
            redirects,
        }
    }

    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    /// Starts a login: stores a fresh state token with the role hint and
    /// returns the provider consent URL.
    #[instrument(skip_all, fields(requested = %requested))]
    pub fn login(&self, session: &mut TransportSession, requested: RequestedRole) -> String {
        let state = StateTokenGuard::issue(session, requested);
        self.provider.authorization_url(&state)
    }

    /// Completes a login.
    ///
    /// The state token is consumed before anything else happens. On success
    /// the transport session is replaced wholesale; on any error it is left
    /// without a state token and otherwise untouched.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidState`] before any outbound call; provider,
    /// directory or session store failures after it.
    #[instrument(skip_all)]
    pub async fn callback(
        &self,
        session: &mut TransportSession,
        params: &CallbackParams,
    ) -> Result<CallbackOutcome, AuthError> {
        let requested =
            StateTokenGuard::validate(session, params.state.as_deref().unwrap_or_default())?;

        if let Some(error) = &params.error {
            return Err(AuthError::ExchangeFailed(format!(
                "provider returned error: {error}"
            )));
        }
        let Some(code) = params.code.as_deref().filter(|c| !c.is_empty()) else {
            return Err(AuthError::ExchangeFailed(
                "callback carried no authorization code".to_string(),
            ));
        };

        let access_token = self.provider.exchange(code).await?;
        let identity = self.provider.fetch_profile(&access_token).await?;

        let resolved = match self.directory.resolve(&identity, requested).await {
            Ok(resolved) => resolved,
            Err(report)
                if matches!(
                    report.current_context(),
                    DirectoryError::AdminSelfSignupBlocked { .. }
                ) =>
            {
                return Ok(CallbackOutcome::SignupBlocked {
                    home_url: self.redirects.home.clone(),
                });
            }
            Err(report) => return Err(report.into()),
        };

        let user = resolved.user;
        let token = self.sessions.issue(user.id()).await?;

        let logo_hint = if resolved.created && user.role() == Role::Pending {
            user.picture().map(str::to_string)
        } else {
            None
        };
        *session = TransportSession::authenticated(&user, token, logo_hint);

        info!(user_id = %user.id(), role = %user.role(), "user signed in");
        Ok(CallbackOutcome::SignedIn {
            landing_url: self.redirects.landing_for(user.role()).to_string(),
            user,
        })
    }

    /// Ends the browser's session and returns where to send it.
    ///
    /// Revocation is best effort: failures are logged and the transport
    /// session is cleared regardless.
    #[instrument(skip_all)]
    pub async fn logout(&self, session: &mut TransportSession) -> &str {
        if let Some(token) = session.session_token() {
            match self.owner_of(session).await {
                Some(user_id) => {
                    if let Err(report) = self.sessions.revoke(user_id, token).await {
                        warn!(user_id = %user_id, error = %report, "failed to revoke session");
                    }
                }
                None => warn!("session token without a resolvable owner; skipping revoke"),
            }
        }

        session.clear();
        &self.redirects.logout
    }

    /// Withdraws a pending recruiter's own signup, then logs the browser out.
    ///
    /// # Errors
    ///
    /// Any [`UserDirectory::reject`] failure. The transport session is left
    /// untouched in that case.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn cancel_signup(
        &self,
        user_id: UserId,
        session: &mut TransportSession,
    ) -> Result<&str, Report<DirectoryError>> {
        self.directory.reject(user_id).await?;
        info!("recruiter withdrew signup");
        Ok(self.logout(session).await)
    }

    async fn owner_of(&self, session: &TransportSession) -> Option<UserId> {
        if let Some(user_id) = session.user_id() {
            return Some(user_id);
        }
        let email = session.email()?;
        match self.directory.find_by_email(email).await {
            Ok(user) => user.map(|u| u.id()),
            Err(report) => {
                warn!(error = %report, "failed to look up session owner");
                None
            }
        }
    }
}
