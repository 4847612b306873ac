//! Single-use anti-forgery token binding a login redirect to its callback.

use crate::error::AuthenticationError;
use crate::role::RequestedRole;
use crate::token::generate_token;
use crate::transport::TransportSession;

/// Issues and checks the OAuth `state` parameter.
pub struct StateTokenGuard;

impl StateTokenGuard {
    /// Generates a fresh state token and records it, together with the role
    /// hint for this attempt, in the transport session. A previous,
    /// unfinished attempt is overwritten.
    pub fn issue(session: &mut TransportSession, requested_role: RequestedRole) -> String {
        let token = generate_token();
        session.begin_login(token.clone(), requested_role);
        token
    }

    /// Checks `provided` against the stored token.
    ///
    /// The stored token is removed whatever the outcome, so it can be used
    /// for at most one callback. On success returns the role hint recorded
    /// at issue time.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationError::InvalidState`] if no token was stored or
    /// the values differ.
    pub fn validate(
        session: &mut TransportSession,
        provided: &str,
    ) -> Result<RequestedRole, AuthenticationError> {
        let (stored, requested_role) = session.take_login();
        match stored {
            Some(expected) if !provided.is_empty() && expected == provided => Ok(requested_role),
            _ => Err(AuthenticationError::InvalidState),
        }
    }
}
