//! Portal roles and the role hint carried through a login attempt.
//!
//! A user holds exactly one [`Role`]. The login entry point additionally
//! carries a [`RequestedRole`], which only matters the first time an email is
//! seen and is mapped to a stored role by the provisioning policy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a portal user.
///
/// `Pending` is a recruiter who signed up but has not been approved by an
/// admin yet. No other values exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Job seeker.
    Applicant,
    /// Approved recruiter.
    Recruiter,
    /// Recruiter waiting for admin approval.
    Pending,
    /// Portal administrator.
    Admin,
}

impl Role {
    /// All roles, in a stable order.
    pub const ALL: [Role; 4] = [Role::Applicant, Role::Recruiter, Role::Pending, Role::Admin];

    /// Returns the lowercase wire name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Applicant => "applicant",
            Self::Recruiter => "recruiter",
            Self::Pending => "pending",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the four role names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError {
    /// The rejected input.
    pub value: String,
}

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.value)
    }
}

impl std::error::Error for ParseRoleError {}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ParseRoleError {
                value: s.to_string(),
            })
    }
}

/// Role asked for by the login entry point (`/auth/login/{role}`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestedRole {
    /// Default entry point.
    #[default]
    Applicant,
    /// Recruiter sign-up, provisioned as pending.
    Recruiter,
    /// Admin entry point; never provisions a new account.
    Admin,
}

impl RequestedRole {
    /// Interprets an optional path hint. Missing or unknown hints fall back to
    /// [`RequestedRole::Applicant`].
    #[must_use]
    pub fn from_hint(hint: Option<&str>) -> Self {
        match hint.map(str::trim) {
            Some("recruiter") => Self::Recruiter,
            Some("admin") => Self::Admin,
            _ => Self::Applicant,
        }
    }

    /// Returns the lowercase wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Applicant => "applicant",
            Self::Recruiter => "recruiter",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for RequestedRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
