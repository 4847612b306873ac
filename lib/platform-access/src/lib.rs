//! Authentication, provisioning and role authorization for the
//! recruitment portal.
//!
//! This crate provides:
//! - Roles (`Role`, `RequestedRole`) and users (`User`)
//! - The anti-forgery state token guard (`StateTokenGuard`)
//! - The typed transport session carried in the sealed cookie
//! - Provisioning policy and admin role transitions (`UserDirectory`)
//! - Durable sessions (`Session`, `SessionStore`)
//! - Role gate decisions (`AuthContext`)
//! - The identity provider seam (`IdentityProvider`, `OAuthConfig`)
//!
//! # Example
//!
//! ```
//! use recruit_portal_platform_access::{
//!     AuthContext, ExternalIdentity, RequestedRole, Role, StateTokenGuard, TransportSession,
//!     User, provisioning_role,
//! };
//!
//! // Login: remember the state token and the role hint
//! let mut session = TransportSession::new();
//! let state = StateTokenGuard::issue(&mut session, RequestedRole::Recruiter);
//!
//! // Callback: the provider hands the state back
//! let requested = StateTokenGuard::validate(&mut session, &state).unwrap();
//! let role = provisioning_role(requested).unwrap();
//! assert_eq!(role, Role::Pending);
//!
//! let identity = ExternalIdentity::new("1234", "rec@example.com");
//! let user = User::from_identity(&identity, role);
//! let session = TransportSession::authenticated(&user, "token".to_string(), None);
//!
//! // Gate: a pending recruiter only reaches the pending page
//! let ctx = AuthContext::from_session(&session);
//! assert!(ctx.authorize(Role::Recruiter).is_err());
//! assert!(ctx.authorize(Role::Pending).is_ok());
//! ```

pub mod csrf;
pub mod directory;
pub mod error;
pub mod gate;
pub mod identity;
pub mod memory;
pub mod oauth;
pub mod provider;
pub mod role;
pub mod session;
pub mod token;
pub mod transport;
pub mod user;

// Re-export main types at crate root
pub use csrf::StateTokenGuard;
pub use directory::{Resolved, UserDirectory, UserStore, provisioning_role};
pub use error::{
    AuthenticationError, AuthorizationError, DirectoryError, ProviderError, SessionStoreError,
};
pub use gate::AuthContext;
pub use identity::ExternalIdentity;
pub use memory::{MemorySessionStore, MemoryUserStore};
pub use oauth::OAuthConfig;
pub use provider::{AccessToken, IdentityProvider};
pub use role::{ParseRoleError, RequestedRole, Role};
pub use session::{Session, SessionStore};
pub use token::generate_token;
pub use transport::TransportSession;
pub use user::User;
