//! Identity, role, and session values for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! `Session` is owned by `SessionStore` and mirrored into a Leptos signal for
//! views. The route guard only ever reads it.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use serde::{Deserialize, Serialize};

use crate::net::provider::ProviderError;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Authorization role attached to a profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
}

impl Role {
    /// Parse a stored role value.
    ///
    /// Only the exact values `admin` and `editor` are recognized. Anything
    /// else (including case or whitespace variants and a missing value)
    /// resolves to `Editor`, the least-privileged authenticated role.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("admin") => Self::Admin,
            Some("editor") => Self::Editor,
            other => {
                log::warn!("unrecognized role {other:?}; treating as editor");
                Self::Editor
            }
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
        }
    }

    /// Dashboard path a signed-in user of this role lands on.
    #[must_use]
    pub fn home_path(self) -> &'static str {
        match self {
            Self::Admin => "/dashboard",
            Self::Editor => "/editor",
        }
    }

    /// Settings path for this role.
    #[must_use]
    pub fn settings_path(self) -> &'static str {
        match self {
            Self::Admin => "/dashboard/settings",
            Self::Editor => "/editor/settings",
        }
    }
}

/// Normalized authenticated user. Immutable for the lifetime of a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque provider user id.
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub role: Role,
}

impl Identity {
    /// Build an identity from a provider account and its profile values.
    ///
    /// The display name falls back to the email local part and then to
    /// `"User"`.
    #[must_use]
    pub fn from_parts(id: &str, email: Option<&str>, profile_name: Option<&str>, profile_role: Option<&str>) -> Self {
        let email = email.unwrap_or_default().trim().to_owned();
        let display_name = profile_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_owned)
            .or_else(|| {
                email
                    .split('@')
                    .next()
                    .filter(|local| !local.is_empty())
                    .map(str::to_owned)
            })
            .unwrap_or_else(|| "User".to_owned());
        Self { id: id.to_owned(), display_name, email, role: Role::parse(profile_role) }
    }
}

/// Current authentication state.
///
/// While `loading` is true the identity must not be used for authorization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub identity: Option<Identity>,
    pub loading: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::restoring()
    }
}

impl Session {
    /// Initial state: nothing known yet.
    #[must_use]
    pub fn restoring() -> Self {
        Self { identity: None, loading: true }
    }

    #[must_use]
    pub fn signed_out() -> Self {
        Self { identity: None, loading: false }
    }

    #[must_use]
    pub fn signed_in(identity: Identity) -> Self {
        Self { identity: Some(identity), loading: false }
    }

    /// Identity usable for authorization, i.e. only once loading finished.
    #[must_use]
    pub fn resolved_identity(&self) -> Option<&Identity> {
        if self.loading { None } else { self.identity.as_ref() }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.resolved_identity().is_some()
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Form-level failures detected before any provider call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("all fields are required")]
    MissingFields,
    #[error("password must be at least {min} characters long")]
    PasswordTooShort { min: usize },
    #[error("enter a valid email address")]
    InvalidEmail,
}

/// Errors surfaced by session-store operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Provider(#[from] ProviderError),

    /// The account exists but its profile row could not be written.
    #[error("account {user_id} was created but its profile could not be saved: {source}")]
    ProfileInconsistency { user_id: String, source: ProviderError },

    /// Restoring a session failed; the store fell back to signed-out.
    #[error("could not restore session: {0}")]
    SessionRestore(ProviderError),
}

impl AuthError {
    /// Stable machine-readable code for UI messaging and logs.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "E_VALIDATION",
            Self::Provider(_) => "E_PROVIDER",
            Self::ProfileInconsistency { .. } => "E_PROFILE_INCONSISTENT",
            Self::SessionRestore(_) => "E_SESSION_RESTORE",
        }
    }
}

/// Trim and check an email address shape (`local@domain`).
///
/// # Errors
///
/// Returns [`ValidationError::MissingFields`] when empty and
/// [`ValidationError::InvalidEmail`] when malformed.
pub fn normalize_email(email: &str) -> Result<String, ValidationError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    let mut parts = trimmed.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => Ok(trimmed.to_owned()),
        _ => Err(ValidationError::InvalidEmail),
    }
}

/// Validate registration input, returning trimmed name and email.
///
/// # Errors
///
/// Returns a [`ValidationError`] for empty fields, a malformed email, or a
/// password shorter than [`MIN_PASSWORD_LEN`].
pub fn validate_registration(name: &str, email: &str, password: &str) -> Result<(String, String), ValidationError> {
    let name = name.trim();
    if name.is_empty() || email.trim().is_empty() || password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    let email = normalize_email(email)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort { min: MIN_PASSWORD_LEN });
    }
    Ok((name.to_owned(), email))
}
