//! Profile returned by the external identity provider.

use serde::Deserialize;

/// Identity asserted by the provider's userinfo endpoint for one callback.
///
/// Only `sub` and `email` are required; everything else is optional so a
/// sparse profile still decodes. This value is consumed by provisioning and
/// never stored as-is.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExternalIdentity {
    /// Provider subject identifier.
    #[serde(rename = "sub")]
    pub subject: String,
    /// Full display name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    /// Public profile page.
    #[serde(default, rename = "profile")]
    pub profile_url: Option<String>,
    /// Avatar image.
    #[serde(default, rename = "picture")]
    pub picture_url: Option<String>,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
}

impl ExternalIdentity {
    /// Creates an identity with only the required fields set.
    #[must_use]
    pub fn new(subject: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            name: None,
            given_name: None,
            family_name: None,
            profile_url: None,
            picture_url: None,
            email: email.into(),
            email_verified: false,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the picture URL.
    #[must_use]
    pub fn with_picture(mut self, picture: impl Into<String>) -> Self {
        self.picture_url = Some(picture.into());
        self
    }

    /// Name to store for a new user.
    ///
    /// Falls back to the given and family names, then to the email address,
    /// because the user record requires a name.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }

        let joined = [self.given_name.as_deref(), self.family_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if joined.is_empty() {
            self.email.clone()
        } else {
            joined
        }
    }

    /// Picture URL with empty strings treated as absent.
    #[must_use]
    pub fn picture(&self) -> Option<&str> {
        self.picture_url.as_deref().filter(|p| !p.is_empty())
    }
}
