//! Provider-neutral identity types and the `IdentityProvider` seam.
//!
//! DESIGN
//! ======
//! `SessionStore` depends only on this trait, so the hosted backend can be
//! swapped (or scripted in tests) without touching session rules. Futures are
//! `?Send` because browser HTTP futures are not `Send`; implementors must
//! still be `Send + Sync` so the store can live in Leptos context.

#[cfg(test)]
#[path = "provider_test.rs"]
mod provider_test;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::state::auth::Role;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by identity-provider operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The provider answered with a non-success status.
    #[error("{message} (status {status})")]
    Rejected { status: u16, message: String },

    /// The request never produced a response.
    #[error("network request failed: {0}")]
    Network(String),

    /// The response body could not be decoded.
    #[error("unexpected provider response: {0}")]
    Parse(String),

    /// The account has no profile row.
    #[error("no profile found for user {user_id}")]
    MissingProfile { user_id: String },

    /// An authenticated call was made without a session.
    #[error("not signed in")]
    NotSignedIn,

    /// No provider is configured, or this build cannot reach one.
    #[error("identity provider unavailable")]
    Unavailable,
}

// =============================================================================
// TYPES
// =============================================================================

/// Account record as reported by the provider's auth service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Row of the `profiles` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Raw stored role; parsed with `Role::parse` so unknown values degrade.
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Values for a profile row inserted at registration.
///
/// `created_at` is stamped by the provider adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Third-party sign-in providers offered on the login page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
}

impl OAuthProvider {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
        }
    }
}

/// Session-change notification emitted by a provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthChange {
    SignedIn(AuthUser),
    SignedOut,
}

/// Callback registered through [`IdentityProvider::on_auth_change`].
pub type AuthListener = Arc<dyn Fn(AuthChange) + Send + Sync>;

// =============================================================================
// TRAIT
// =============================================================================

/// Hosted authentication + profile storage.
#[async_trait::async_trait(?Send)]
pub trait IdentityProvider: Send + Sync {
    /// Return the account of the active session, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if the session cannot be checked.
    async fn current_session(&self) -> Result<Option<AuthUser>, ProviderError>;

    /// Verify credentials and start a session.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Rejected`] for bad credentials.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthUser, ProviderError>;

    /// Create an account. `None` means the account awaits confirmation and
    /// no user record was returned.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if the provider refuses the sign-up.
    async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<Option<AuthUser>, ProviderError>;

    /// End the active session.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if the provider refuses the sign-out.
    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// URL that starts a third-party sign-in returning to `redirect_to`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Unavailable`] if the provider has no OAuth.
    fn oauth_authorize_url(&self, provider: OAuthProvider, redirect_to: &str) -> Result<String, ProviderError>;

    /// Read the profile row for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingProfile`] when no row exists.
    async fn fetch_profile(&self, user_id: &str) -> Result<ProfileRow, ProviderError>;

    /// Insert a profile row.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if the row is rejected.
    async fn insert_profile(&self, profile: &NewProfile) -> Result<(), ProviderError>;

    /// Register a listener for provider-side session changes.
    fn on_auth_change(&self, listener: AuthListener);
}

/// Provider used when no backend is configured. Every call is refused.
#[derive(Debug, Default)]
pub struct UnconfiguredProvider;

#[async_trait::async_trait(?Send)]
impl IdentityProvider for UnconfiguredProvider {
    async fn current_session(&self) -> Result<Option<AuthUser>, ProviderError> {
        Err(ProviderError::Unavailable)
    }

    async fn sign_in_with_password(&self, _email: &str, _password: &str) -> Result<AuthUser, ProviderError> {
        Err(ProviderError::Unavailable)
    }

    async fn sign_up(&self, _email: &str, _password: &str, _name: &str) -> Result<Option<AuthUser>, ProviderError> {
        Err(ProviderError::Unavailable)
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        Err(ProviderError::Unavailable)
    }

    fn oauth_authorize_url(&self, _provider: OAuthProvider, _redirect_to: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Unavailable)
    }

    async fn fetch_profile(&self, _user_id: &str) -> Result<ProfileRow, ProviderError> {
        Err(ProviderError::Unavailable)
    }

    async fn insert_profile(&self, _profile: &NewProfile) -> Result<(), ProviderError> {
        Err(ProviderError::Unavailable)
    }

    fn on_auth_change(&self, _listener: AuthListener) {}
}
