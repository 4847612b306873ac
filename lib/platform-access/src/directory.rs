//! User lookup, first-login provisioning and admin role transitions.

use async_trait::async_trait;
use recruit_portal_core::{Result, UserId};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::error::DirectoryError;
use crate::identity::ExternalIdentity;
use crate::role::{RequestedRole, Role};
use crate::user::User;

/// Persistence for users.
///
/// Implementations map their own failures to
/// [`DirectoryError::ReadFailed`] / [`DirectoryError::WriteFailed`].
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DirectoryError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DirectoryError>;

    /// Inserts `user` unless a user with the same email exists, as a single
    /// atomic operation. Returns whether the row was inserted.
    async fn insert_if_absent(&self, user: &User) -> Result<bool, DirectoryError>;

    /// Sets the role to `to` only if it is currently `from`. Returns whether
    /// a row changed.
    async fn update_role_if(&self, id: UserId, from: Role, to: Role)
    -> Result<bool, DirectoryError>;

    /// Deletes the user only if it currently holds `role`. Returns whether a
    /// row was removed.
    async fn delete_if_role(&self, id: UserId, role: Role) -> Result<bool, DirectoryError>;

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, DirectoryError>;

    /// Every user, oldest first.
    async fn list_all(&self) -> Result<Vec<User>, DirectoryError>;
}

/// Role given to a user seen for the first time, or `None` if the request
/// must not create an account.
#[must_use]
pub fn provisioning_role(requested: RequestedRole) -> Option<Role> {
    match requested {
        RequestedRole::Applicant => Some(Role::Applicant),
        RequestedRole::Recruiter => Some(Role::Pending),
        RequestedRole::Admin => None,
    }
}

/// Result of [`UserDirectory::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub user: User,
    /// True when this call created the user.
    pub created: bool,
}

/// Resolves provider identities to portal users.
#[derive(Clone)]
pub struct UserDirectory {
    store: Arc<dyn UserStore>,
}

impl UserDirectory {
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Finds the user for `identity.email`, creating one on first login.
    ///
    /// An existing user is returned unchanged, whatever `requested` says.
    /// Losing a concurrent first-login race is resolved by reading the
    /// winner's row.
    ///
    /// # Errors
    ///
    /// [`DirectoryError::AdminSelfSignupBlocked`] when a new email asks for
    /// admin; read/write failures from the store otherwise.
    #[instrument(skip_all, fields(email = %identity.email, requested = %requested))]
    pub async fn resolve(
        &self,
        identity: &ExternalIdentity,
        requested: RequestedRole,
    ) -> Result<Resolved, DirectoryError> {
        if let Some(user) = self.store.find_by_email(&identity.email).await? {
            return Ok(Resolved {
                user,
                created: false,
            });
        }

        let Some(role) = provisioning_role(requested) else {
            warn!("blocked admin self-signup");
            return Err(DirectoryError::AdminSelfSignupBlocked {
                email: identity.email.clone(),
            }
            .into());
        };

        let user = User::from_identity(identity, role);
        if self.store.insert_if_absent(&user).await? {
            info!(user_id = %user.id(), role = %role, "provisioned user");
            return Ok(Resolved {
                user,
                created: true,
            });
        }

        match self.store.find_by_email(&identity.email).await? {
            Some(user) => Ok(Resolved {
                user,
                created: false,
            }),
            None => Err(DirectoryError::WriteFailed {
                details: "insert conflicted but no user exists for the email".to_string(),
            }
            .into()),
        }
    }

    /// Lists recruiters waiting for approval.
    pub async fn pending_recruiters(&self) -> Result<Vec<User>, DirectoryError> {
        self.store.list_by_role(Role::Pending).await
    }

    /// Lists every user.
    pub async fn all_users(&self) -> Result<Vec<User>, DirectoryError> {
        self.store.list_all().await
    }

    /// Promotes a pending recruiter.
    ///
    /// # Errors
    ///
    /// [`DirectoryError::UserNotFound`] or [`DirectoryError::NotPending`] when
    /// there is nothing to approve.
    #[instrument(skip_all, fields(user_id = %id))]
    pub async fn approve(&self, id: UserId) -> Result<(), DirectoryError> {
        if self
            .store
            .update_role_if(id, Role::Pending, Role::Recruiter)
            .await?
        {
            info!("approved recruiter");
            return Ok(());
        }
        Err(self.transition_failure(id).await)
    }

    /// Removes a pending recruiter.
    ///
    /// # Errors
    ///
    /// Same as [`UserDirectory::approve`].
    #[instrument(skip_all, fields(user_id = %id))]
    pub async fn reject(&self, id: UserId) -> Result<(), DirectoryError> {
        if self.store.delete_if_role(id, Role::Pending).await? {
            info!("rejected recruiter");
            return Ok(());
        }
        Err(self.transition_failure(id).await)
    }

    async fn transition_failure(&self, id: UserId) -> rootcause::Report<DirectoryError> {
        match self.store.find_by_id(id).await {
            Ok(Some(user)) => DirectoryError::NotPending {
                user_id: id,
                role: user.role(),
            }
            .into(),
            Ok(None) => DirectoryError::UserNotFound { user_id: id }.into(),
            Err(report) => report,
        }
    }

    /// Looks a user up by email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DirectoryError> {
        self.store.find_by_email(email).await
    }
}
