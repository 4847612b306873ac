//! Role gate decisions.
//!
//! The web layer runs two stages per protected route group: the first turns
//! the transport session into an [`AuthContext`], the second checks that
//! context against the group's required role.

use crate::error::AuthorizationError;
use crate::role::Role;
use crate::transport::TransportSession;

/// Authorization context attached to every request behind the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthContext {
    /// No role in the transport session.
    Anonymous,
    /// The caller's role, as recorded at login.
    Authenticated(Role),
}

impl AuthContext {
    /// Reads the role from a transport session.
    #[must_use]
    pub fn from_session(session: &TransportSession) -> Self {
        session.role().map_or(Self::Anonymous, Self::Authenticated)
    }

    /// Checks the context against a route group's required role.
    ///
    /// Matching is exact: an admin does not pass a recruiter gate and a
    /// pending recruiter passes only the pending gate.
    ///
    /// # Errors
    ///
    /// [`AuthorizationError::Unauthorized`] for anonymous callers,
    /// [`AuthorizationError::Forbidden`] for any other role.
    pub fn authorize(&self, required: Role) -> Result<Role, AuthorizationError> {
        match self {
            Self::Anonymous => Err(AuthorizationError::Unauthorized),
            Self::Authenticated(role) if *role == required => Ok(*role),
            Self::Authenticated(role) => Err(AuthorizationError::Forbidden {
                required,
                actual: *role,
            }),
        }
    }
}
