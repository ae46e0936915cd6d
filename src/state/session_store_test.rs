use super::*;
use crate::net::provider::{AuthListener, ProfileRow};
use futures::channel::oneshot;
use std::collections::HashMap;
use std::sync::Mutex as StdMutex;

// =========================================================================
// MockProvider
// =========================================================================

#[derive(Default)]
struct MockProvider {
    session: StdMutex<Option<Result<Option<AuthUser>, ProviderError>>>,
    sign_in: StdMutex<Option<Result<AuthUser, ProviderError>>>,
    sign_up: StdMutex<Option<Result<Option<AuthUser>, ProviderError>>>,
    sign_out: StdMutex<Option<Result<(), ProviderError>>>,
    sign_out_hold: StdMutex<Option<oneshot::Receiver<()>>>,
    profiles: StdMutex<HashMap<String, ProfileRow>>,
    insert_error: StdMutex<Option<ProviderError>>,
    inserted: StdMutex<Vec<NewProfile>>,
    calls: StdMutex<Vec<&'static str>>,
    listeners: StdMutex<Vec<AuthListener>>,
}

impl MockProvider {
    fn with_profile(self, id: &str, name: &str, role: &str) -> Self {
        self.profiles.lock().unwrap().insert(
            id.to_owned(),
            ProfileRow {
                id: id.to_owned(),
                name: Some(name.to_owned()),
                email: None,
                role: Some(role.to_owned()),
                created_at: None,
            },
        );
        self
    }

    fn with_session(self, user: AuthUser) -> Self {
        *self.session.lock().unwrap() = Some(Ok(Some(user)));
        self
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn emit(&self, change: AuthChange) {
        let listeners = self.listeners.lock().unwrap().clone();
        for listener in listeners {
            listener(change.clone());
        }
    }
}

#[async_trait::async_trait(?Send)]
impl IdentityProvider for MockProvider {
    async fn current_session(&self) -> Result<Option<AuthUser>, ProviderError> {
        self.calls.lock().unwrap().push("current_session");
        self.session.lock().unwrap().clone().unwrap_or(Ok(None))
    }

    async fn sign_in_with_password(&self, email: &str, _password: &str) -> Result<AuthUser, ProviderError> {
        self.calls.lock().unwrap().push("sign_in");
        self.sign_in
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(user("u-login", email)))
    }

    async fn sign_up(&self, email: &str, _password: &str, _name: &str) -> Result<Option<AuthUser>, ProviderError> {
        self.calls.lock().unwrap().push("sign_up");
        self.sign_up
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(Some(user("u-new", email))))
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.calls.lock().unwrap().push("sign_out");
        let hold = self.sign_out_hold.lock().unwrap().take();
        if let Some(hold) = hold {
            let _ = hold.await;
        }
        self.sign_out.lock().unwrap().clone().unwrap_or(Ok(()))
    }

    fn oauth_authorize_url(&self, provider: OAuthProvider, redirect_to: &str) -> Result<String, ProviderError> {
        Ok(format!("https://idp.test/authorize?provider={}&redirect_to={redirect_to}", provider.as_str()))
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<ProfileRow, ProviderError> {
        self.calls.lock().unwrap().push("fetch_profile");
        self.profiles
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .ok_or_else(|| ProviderError::MissingProfile { user_id: user_id.to_owned() })
    }

    async fn insert_profile(&self, profile: &NewProfile) -> Result<(), ProviderError> {
        self.calls.lock().unwrap().push("insert_profile");
        if let Some(err) = self.insert_error.lock().unwrap().clone() {
            return Err(err);
        }
        self.inserted.lock().unwrap().push(profile.clone());
        Ok(())
    }

    fn on_auth_change(&self, listener: AuthListener) {
        self.listeners.lock().unwrap().push(listener);
    }
}

fn user(id: &str, email: &str) -> AuthUser {
    AuthUser { id: id.to_owned(), email: Some(email.to_owned()) }
}

fn store_with(provider: MockProvider) -> (SessionStore, Arc<MockProvider>) {
    let provider = Arc::new(provider);
    (SessionStore::new(provider.clone()), provider)
}

fn recorder(store: &SessionStore) -> Arc<StdMutex<Vec<Session>>> {
    let seen = Arc::new(StdMutex::new(Vec::new()));
    let sink = seen.clone();
    store.subscribe(Arc::new(move |session: &Session| sink.lock().unwrap().push(session.clone())));
    seen
}

// =========================================================================
// initialize
// =========================================================================

#[tokio::test]
async fn new_store_starts_loading() {
    let (store, _) = store_with(MockProvider::default());
    assert_eq!(store.session(), Session::restoring());
}

#[tokio::test]
async fn initialize_without_session_signs_out() {
    let (store, provider) = store_with(MockProvider::default());
    store.initialize().await.unwrap();
    assert_eq!(store.session(), Session::signed_out());
    assert_eq!(provider.calls(), vec!["current_session"]);
}

#[tokio::test]
async fn initialize_restores_identity_from_profile() {
    let (store, _) = store_with(
        MockProvider::default()
            .with_session(user("u1", "ada@example.com"))
            .with_profile("u1", "Ada", "admin"),
    );
    store.initialize().await.unwrap();
    let session = store.session();
    assert!(!session.loading);
    let identity = session.identity.unwrap();
    assert_eq!(identity.id, "u1");
    assert_eq!(identity.display_name, "Ada");
    assert_eq!(identity.email, "ada@example.com");
    assert_eq!(identity.role, Role::Admin);
}

#[tokio::test]
async fn initialize_unknown_role_restores_as_editor() {
    let (store, _) = store_with(
        MockProvider::default()
            .with_session(user("u1", "x@example.com"))
            .with_profile("u1", "X", "owner"),
    );
    store.initialize().await.unwrap();
    assert_eq!(store.session().identity.unwrap().role, Role::Editor);
}

#[tokio::test]
async fn initialize_provider_error_fails_open_to_signed_out() {
    let provider = MockProvider::default();
    *provider.session.lock().unwrap() = Some(Err(ProviderError::Network("offline".to_owned())));
    let (store, _) = store_with(provider);
    let err = store.initialize().await.unwrap_err();
    assert!(matches!(err, AuthError::SessionRestore(ProviderError::Network(_))));
    assert_eq!(store.session(), Session::signed_out());
}

#[tokio::test]
async fn initialize_missing_profile_fails_open_to_signed_out() {
    let (store, provider) = store_with(MockProvider::default().with_session(user("u1", "a@b.com")));
    let err = store.initialize().await.unwrap_err();
    assert!(matches!(err, AuthError::SessionRestore(ProviderError::MissingProfile { .. })));
    assert_eq!(store.session(), Session::signed_out());
    assert_eq!(provider.calls(), vec!["current_session", "fetch_profile", "sign_out"]);
}

#[tokio::test]
async fn initialize_network_error_leaves_provider_alone() {
    let provider = MockProvider::default();
    *provider.session.lock().unwrap() = Some(Err(ProviderError::Network("offline".to_owned())));
    let (store, provider) = store_with(provider);
    store.initialize().await.unwrap_err();
    assert_eq!(provider.calls(), vec!["current_session"]);
}

// =========================================================================
// subscribe / notify
// =========================================================================

#[tokio::test]
async fn subscribers_see_each_transition() {
    let (store, _) = store_with(
        MockProvider::default()
            .with_session(user("u1", "ada@example.com"))
            .with_profile("u1", "Ada", "editor"),
    );
    let seen = recorder(&store);
    store.initialize().await.unwrap();
    store.logout().await.unwrap();
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].identity.as_ref().unwrap().id, "u1");
    assert_eq!(seen[1], Session::signed_out());
}

#[tokio::test]
async fn unsubscribe_stops_notifications() {
    let (store, _) = store_with(MockProvider::default());
    let seen = Arc::new(StdMutex::new(0_usize));
    let sink = seen.clone();
    let id = store.subscribe(Arc::new(move |_: &Session| *sink.lock().unwrap() += 1));
    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.initialize().await.unwrap();
    assert_eq!(*seen.lock().unwrap(), 0);
}

// =========================================================================
// login
// =========================================================================

#[tokio::test]
async fn login_does_not_mutate_session() {
    let (store, provider) = store_with(MockProvider::default());
    store.initialize().await.unwrap();
    store.login("ada@example.com", "password123").await.unwrap();
    assert_eq!(store.session(), Session::signed_out());
    assert_eq!(provider.calls(), vec!["current_session", "sign_in"]);
}

#[tokio::test]
async fn login_rejection_is_provider_error() {
    let provider = MockProvider::default();
    *provider.sign_in.lock().unwrap() =
        Some(Err(ProviderError::Rejected { status: 400, message: "Invalid login credentials".to_owned() }));
    let (store, _) = store_with(provider);
    let err = store.login("ada@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, AuthError::Provider(ProviderError::Rejected { status: 400, .. })));
    assert!(err.to_string().contains("Invalid login credentials"));
}

#[tokio::test]
async fn login_rejects_empty_input_before_provider() {
    let (store, provider) = store_with(MockProvider::default());
    assert!(matches!(
        store.login("", "pw").await,
        Err(AuthError::Validation(ValidationError::MissingFields))
    ));
    assert!(matches!(
        store.login("ada@example.com", "").await,
        Err(AuthError::Validation(ValidationError::MissingFields))
    ));
    assert!(matches!(
        store.login("not-an-email", "pw").await,
        Err(AuthError::Validation(ValidationError::InvalidEmail))
    ));
    assert!(provider.calls().is_empty());
}

// =========================================================================
// register
// =========================================================================

#[tokio::test]
async fn register_empty_name_fails_before_provider() {
    let (store, provider) = store_with(MockProvider::default());
    let err = store.register("", "a@b.com", "longpassword", Role::Editor).await.unwrap_err();
    assert!(matches!(err, AuthError::Validation(ValidationError::MissingFields)));
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn register_short_password_fails_before_provider() {
    let (store, provider) = store_with(MockProvider::default());
    let err = store.register("A", "a@b.com", "short", Role::Editor).await.unwrap_err();
    assert!(matches!(err, AuthError::Validation(ValidationError::PasswordTooShort { min: 8 })));
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn register_creates_profile_with_requested_role() {
    let (store, provider) = store_with(MockProvider::default());
    let outcome = store
        .register(" Ada ", "ada@example.com", "longpassword", Role::Admin)
        .await
        .unwrap();
    assert_eq!(outcome, Registration::ProfileCreated);
    let inserted = provider.inserted.lock().unwrap().clone();
    assert_eq!(
        inserted,
        vec![NewProfile {
            id: "u-new".to_owned(),
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            role: Role::Admin,
        }]
    );
    assert_eq!(provider.calls(), vec!["sign_up", "insert_profile"]);
}

#[tokio::test]
async fn register_profile_failure_surfaces_inconsistency() {
    let provider = MockProvider::default();
    *provider.insert_error.lock().unwrap() = Some(ProviderError::Rejected {
        status: 403,
        message: "new row violates row-level security policy".to_owned(),
    });
    let (store, _) = store_with(provider);
    let err = store
        .register("Ada", "ada@example.com", "longpassword", Role::Editor)
        .await
        .unwrap_err();
    match err {
        AuthError::ProfileInconsistency { user_id, source } => {
            assert_eq!(user_id, "u-new");
            assert!(matches!(source, ProviderError::Rejected { status: 403, .. }));
        }
        other => panic!("expected ProfileInconsistency, got {other:?}"),
    }
}

#[tokio::test]
async fn register_awaiting_confirmation_skips_profile() {
    let provider = MockProvider::default();
    *provider.sign_up.lock().unwrap() = Some(Ok(None));
    let (store, provider) = store_with(provider);
    let outcome = store
        .register("Ada", "ada@example.com", "longpassword", Role::Editor)
        .await
        .unwrap();
    assert_eq!(outcome, Registration::AwaitingConfirmation);
    assert_eq!(provider.calls(), vec!["sign_up"]);
}

#[tokio::test]
async fn register_sign_up_rejection_is_provider_error() {
    let provider = MockProvider::default();
    *provider.sign_up.lock().unwrap() =
        Some(Err(ProviderError::Rejected { status: 422, message: "User already registered".to_owned() }));
    let (store, provider) = store_with(provider);
    let err = store
        .register("Ada", "ada@example.com", "longpassword", Role::Editor)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Provider(ProviderError::Rejected { status: 422, .. })));
    assert!(provider.inserted.lock().unwrap().is_empty());
}

// =========================================================================
// logout
// =========================================================================

#[tokio::test]
async fn logout_failure_leaves_session_unchanged() {
    let provider = MockProvider::default()
        .with_session(user("u1", "ada@example.com"))
        .with_profile("u1", "Ada", "admin");
    *provider.sign_out.lock().unwrap() = Some(Err(ProviderError::Network("offline".to_owned())));
    let (store, _) = store_with(provider);
    store.initialize().await.unwrap();
    let before = store.session();
    assert!(store.logout().await.is_err());
    assert_eq!(store.session(), before);
}

// =========================================================================
// apply_auth_change / follow_provider
// =========================================================================

#[tokio::test]
async fn signed_in_change_loads_identity() {
    let (store, _) = store_with(MockProvider::default().with_profile("u1", "Ada", "editor"));
    store.initialize().await.unwrap();
    store
        .apply_auth_change(AuthChange::SignedIn(user("u1", "ada@example.com")))
        .await
        .unwrap();
    let identity = store.session().identity.unwrap();
    assert_eq!(identity.role, Role::Editor);
    assert_eq!(identity.display_name, "Ada");
}

#[tokio::test]
async fn signed_in_change_for_current_identity_is_noop() {
    let (store, provider) = store_with(
        MockProvider::default()
            .with_session(user("u1", "ada@example.com"))
            .with_profile("u1", "Ada", "admin"),
    );
    store.initialize().await.unwrap();
    store
        .apply_auth_change(AuthChange::SignedIn(user("u1", "ada@example.com")))
        .await
        .unwrap();
    assert_eq!(provider.calls(), vec!["current_session", "fetch_profile"]);
}

#[tokio::test]
async fn signed_in_change_without_profile_signs_out() {
    let (store, _) = store_with(MockProvider::default());
    store.initialize().await.unwrap();
    let err = store
        .apply_auth_change(AuthChange::SignedIn(user("ghost", "g@example.com")))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::SessionRestore(_)));
    assert_eq!(store.session(), Session::signed_out());
}

#[tokio::test]
async fn signed_in_change_without_profile_ends_provider_session() {
    let (store, provider) = store_with(MockProvider::default());
    store.initialize().await.unwrap();
    store
        .apply_auth_change(AuthChange::SignedIn(user("ghost", "g@example.com")))
        .await
        .unwrap_err();
    assert_eq!(provider.calls(), vec!["current_session", "fetch_profile", "sign_out"]);
}

#[tokio::test]
async fn failed_provider_sign_out_still_signs_out_locally() {
    let provider = MockProvider::default();
    *provider.sign_out.lock().unwrap() = Some(Err(ProviderError::Network("offline".to_owned())));
    let (store, _) = store_with(provider);
    store.initialize().await.unwrap();
    let err = store
        .apply_auth_change(AuthChange::SignedIn(user("ghost", "g@example.com")))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::SessionRestore(ProviderError::MissingProfile { .. })));
    assert_eq!(store.session(), Session::signed_out());
}

#[tokio::test]
async fn follow_provider_applies_notifications() {
    let (store, provider) = store_with(
        MockProvider::default()
            .with_session(user("u1", "ada@example.com"))
            .with_profile("u1", "Ada", "admin"),
    );
    store.follow_provider(futures::executor::block_on);
    store.initialize().await.unwrap();
    assert!(store.session().is_authenticated());
    provider.emit(AuthChange::SignedOut);
    assert_eq!(store.session(), Session::signed_out());
}

#[tokio::test]
async fn dropped_store_ignores_late_notifications() {
    let provider = Arc::new(MockProvider::default());
    let store = SessionStore::new(provider.clone());
    store.follow_provider(|_fut| panic!("store is gone; nothing should be scheduled"));
    drop(store);
    provider.emit(AuthChange::SignedOut);
}

#[tokio::test]
async fn oauth_url_comes_from_provider() {
    let (store, _) = store_with(MockProvider::default());
    let url = store
        .sign_in_with_oauth(OAuthProvider::Google, "http://localhost/dashboard")
        .unwrap();
    assert!(url.starts_with("https://idp.test/authorize?provider=google"));
}

// =========================================================================
// ordering
// =========================================================================

#[tokio::test]
async fn session_operations_apply_in_gate_order() {
    let (store, provider) = store_with(
        MockProvider::default()
            .with_session(user("u1", "ada@example.com"))
            .with_profile("u1", "Ada", "admin")
            .with_profile("u2", "Grace", "editor"),
    );
    store.initialize().await.unwrap();
    let (release, hold) = oneshot::channel();
    *provider.sign_out_hold.lock().unwrap() = Some(hold);

    let logout = store.logout();
    let sign_in = store.apply_auth_change(AuthChange::SignedIn(user("u2", "grace@example.com")));
    futures::pin_mut!(logout, sign_in);

    assert!(futures::poll!(&mut logout).is_pending());
    assert!(futures::poll!(&mut sign_in).is_pending());
    assert_eq!(store.session().identity.as_ref().unwrap().id, "u1");

    release.send(()).unwrap();
    logout.await.unwrap();
    assert_eq!(store.session(), Session::signed_out());
    sign_in.await.unwrap();
    assert_eq!(store.session().identity.unwrap().id, "u2");
}
