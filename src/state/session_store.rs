//! Single source of truth for the browser session.
//!
//! ARCHITECTURE
//! ============
//! `SessionStore` is built once in `App`, shared through Leptos context, and
//! mirrors every transition to subscribers (the app bridges it into an
//! `RwSignal<Session>`). It never talks HTTP itself; the injected
//! `IdentityProvider` does.
//!
//! ORDERING
//! ========
//! `initialize`, `login`, `register`, `logout`, and `apply_auth_change` each
//! hold one async gate for their full duration, so their effects on the
//! session land in the order the gate was taken. `login` and `register` do
//! not write the session: the provider's `SignedIn` notification is queued
//! behind them and applied by `apply_auth_change` afterwards. Callers must not
//! expect the session to be updated when `login` resolves.

#[cfg(test)]
#[path = "session_store_test.rs"]
mod session_store_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::LocalBoxFuture;
use parking_lot::Mutex;

use super::auth::{AuthError, Identity, Role, Session, ValidationError, normalize_email, validate_registration};
use crate::net::provider::{AuthChange, AuthUser, IdentityProvider, NewProfile, OAuthProvider, ProviderError};

/// Callback invoked with the new session after each transition.
pub type SessionListener = Arc<dyn Fn(&Session) + Send + Sync>;

/// Handle returned by [`SessionStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Result of a successful registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
    /// Account and profile row both exist.
    ProfileCreated,
    /// The provider is waiting on email confirmation; no profile was written.
    AwaitingConfirmation,
}

struct Inner {
    provider: Arc<dyn IdentityProvider>,
    session: Mutex<Session>,
    listeners: Mutex<Vec<(SubscriptionId, SessionListener)>>,
    next_subscription: AtomicU64,
    gate: futures::lock::Mutex<()>,
}

/// Shared, cheaply clonable session store.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    /// Create a store in the restoring state (`loading = true`).
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            inner: Arc::new(Inner {
                provider,
                session: Mutex::new(Session::restoring()),
                listeners: Mutex::new(Vec::new()),
                next_subscription: AtomicU64::new(1),
                gate: futures::lock::Mutex::new(()),
            }),
        }
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.inner.session.lock().clone()
    }

    pub fn subscribe(&self, listener: SessionListener) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.inner.listeners.lock().push((id, listener));
        id
    }

    /// Returns `true` if the subscription existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.inner.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Route provider session-change notifications into
    /// [`apply_auth_change`](Self::apply_auth_change).
    ///
    /// `spawn` must schedule the future rather than poll it inline: the
    /// provider notifies while a gated operation is still running.
    pub fn follow_provider<S>(&self, spawn: S)
    where
        S: Fn(LocalBoxFuture<'static, ()>) + Send + Sync + 'static,
    {
        let weak = Arc::downgrade(&self.inner);
        self.inner.provider.on_auth_change(Arc::new(move |change| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let store = SessionStore { inner };
            spawn(Box::pin(async move {
                if let Err(e) = store.apply_auth_change(change).await {
                    log::error!("session change could not be applied: {e}");
                }
            }));
        }));
    }

    /// Restore the session from the provider.
    ///
    /// Always leaves `loading = false`. Failures resolve to signed-out and are
    /// returned as [`AuthError::SessionRestore`].
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SessionRestore`] if the provider or profile lookup fails.
    pub async fn initialize(&self) -> Result<(), AuthError> {
        let _turn = self.inner.gate.lock().await;
        self.set(Session::restoring());
        match self.restore().await {
            Ok(Some(identity)) => {
                log::info!("session restored for {} ({})", identity.email, identity.role.as_str());
                self.set(Session::signed_in(identity));
                Ok(())
            }
            Ok(None) => {
                self.set(Session::signed_out());
                Ok(())
            }
            Err(e) => {
                log::error!("error checking user session: {e}");
                self.set(Session::signed_out());
                Err(AuthError::SessionRestore(e))
            }
        }
    }

    /// Verify credentials with the provider.
    ///
    /// Does not update the session; see the module docs.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty or malformed input, or the
    /// provider's rejection.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        if password.is_empty() {
            return Err(ValidationError::MissingFields.into());
        }
        let email = normalize_email(email)?;
        let _turn = self.inner.gate.lock().await;
        match self.inner.provider.sign_in_with_password(&email, password).await {
            Ok(user) => {
                log::info!("signed in as {}", user.id);
                Ok(())
            }
            Err(e) => {
                log::error!("error signing in: {e}");
                Err(e.into())
            }
        }
    }

    /// Create an account and its profile row.
    ///
    /// # Errors
    ///
    /// Returns a validation error before contacting the provider, the
    /// provider's sign-up rejection, or [`AuthError::ProfileInconsistency`]
    /// when the account was created but the profile row was not.
    pub async fn register(&self, name: &str, email: &str, password: &str, role: Role) -> Result<Registration, AuthError> {
        let (name, email) = validate_registration(name, email, password)?;
        let _turn = self.inner.gate.lock().await;
        let user = self
            .inner
            .provider
            .sign_up(&email, password, &name)
            .await
            .inspect_err(|e| log::error!("error during registration: {e}"))?;
        let Some(user) = user else {
            log::info!("registration for {email} awaits confirmation");
            return Ok(Registration::AwaitingConfirmation);
        };
        let profile = NewProfile { id: user.id.clone(), name, email, role };
        if let Err(source) = self.inner.provider.insert_profile(&profile).await {
            log::error!("account {} created without profile: {source}", user.id);
            return Err(AuthError::ProfileInconsistency { user_id: user.id, source });
        }
        log::info!("registered {} as {}", user.id, role.as_str());
        Ok(Registration::ProfileCreated)
    }

    /// Sign out. The session is cleared only if the provider confirms.
    ///
    /// # Errors
    ///
    /// Returns the provider's error; the session is left unchanged.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let _turn = self.inner.gate.lock().await;
        match self.inner.provider.sign_out().await {
            Ok(()) => {
                log::info!("signed out");
                self.set(Session::signed_out());
                Ok(())
            }
            Err(e) => {
                log::error!("error signing out: {e}");
                Err(e.into())
            }
        }
    }

    /// URL that starts a third-party sign-in returning to `redirect_to`.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if OAuth is not available.
    pub fn sign_in_with_oauth(&self, provider: OAuthProvider, redirect_to: &str) -> Result<String, AuthError> {
        self.inner
            .provider
            .oauth_authorize_url(provider, redirect_to)
            .map_err(AuthError::from)
    }

    /// Apply a provider session-change notification.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SessionRestore`] if the profile of a newly signed
    /// in account cannot be loaded; the provider session is then ended and
    /// the session is signed-out.
    pub async fn apply_auth_change(&self, change: AuthChange) -> Result<(), AuthError> {
        let _turn = self.inner.gate.lock().await;
        match change {
            AuthChange::SignedOut => {
                self.set(Session::signed_out());
                Ok(())
            }
            AuthChange::SignedIn(user) => {
                let current = self.session();
                if current.resolved_identity().is_some_and(|identity| identity.id == user.id) {
                    return Ok(());
                }
                match self.load_identity(&user).await {
                    Ok(identity) => {
                        log::info!("session started for {} ({})", identity.email, identity.role.as_str());
                        self.set(Session::signed_in(identity));
                        Ok(())
                    }
                    Err(e) => {
                        log::error!("profile for {} could not be loaded: {e}", user.id);
                        self.discard_provider_session().await;
                        self.set(Session::signed_out());
                        Err(AuthError::SessionRestore(e))
                    }
                }
            }
        }
    }

    async fn restore(&self) -> Result<Option<Identity>, ProviderError> {
        let Some(user) = self.inner.provider.current_session().await? else {
            return Ok(None);
        };
        match self.load_identity(&user).await {
            Ok(identity) => Ok(Some(identity)),
            Err(e) => {
                self.discard_provider_session().await;
                Err(e)
            }
        }
    }

    /// End a provider session that has no usable profile, so its tokens do
    /// not outlive the signed-out state.
    async fn discard_provider_session(&self) {
        if let Err(e) = self.inner.provider.sign_out().await {
            log::warn!("provider session could not be ended: {e}");
        }
    }

    async fn load_identity(&self, user: &AuthUser) -> Result<Identity, ProviderError> {
        let profile = self.inner.provider.fetch_profile(&user.id).await?;
        let email = user.email.as_deref().or(profile.email.as_deref());
        Ok(Identity::from_parts(&user.id, email, profile.name.as_deref(), profile.role.as_deref()))
    }

    fn set(&self, next: Session) {
        {
            let mut session = self.inner.session.lock();
            if *session == next {
                return;
            }
            *session = next.clone();
        }
        let listeners: Vec<SessionListener> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(&next);
        }
    }
}
