//! Root application component with routing and context providers.
//!
//! ARCHITECTURE
//! ============
//! `App` builds the identity provider from compile-time configuration, wraps
//! it in one `SessionStore`, and mirrors the store into an
//! `RwSignal<Session>` that every `RouteGate` reads. Provider session-change
//! notifications are routed back into the store on the local executor.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::notice_banner::NoticeBanner;
use crate::components::route_gate::{RouteGate, UnknownRoute};
use crate::config::ProviderConfig;
use crate::net::provider::{IdentityProvider, UnconfiguredProvider};
use crate::net::supabase::SupabaseProvider;
use crate::pages::{
    dashboard::{AdminDashboardPage, EditorDashboardPage},
    landing::LandingPage,
    login::LoginPage,
    register::RegisterPage,
    settings::SettingsPage,
};
use crate::state::auth::Session;
use crate::state::session_store::SessionStore;
use crate::state::ui::UiState;
use crate::util::theme;

/// Pick the provider adapter for this build.
fn build_provider() -> Arc<dyn IdentityProvider> {
    match ProviderConfig::from_env() {
        Ok(config) => {
            log::info!("identity provider at {}", config.url);
            Arc::new(SupabaseProvider::new(config))
        }
        Err(e) => {
            log::warn!("identity provider not configured ({e}); sign-in is disabled");
            Arc::new(UnconfiguredProvider)
        }
    }
}

/// Root application component.
///
/// Provides `SessionStore`, `RwSignal<Session>`, and `RwSignal<UiState>`, and
/// sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let store = SessionStore::new(build_provider());
    let session = RwSignal::new(store.session());
    store.subscribe(Arc::new(move |next: &Session| session.set(next.clone())));

    let ui = RwSignal::new(UiState::with_theme(theme::read_preference()));
    Effect::new(move || theme::apply(ui.with(|u| u.theme)));

    #[cfg(feature = "csr")]
    {
        store.follow_provider(|task| leptos::task::spawn_local(task));
        let store = store.clone();
        leptos::task::spawn_local(async move {
            if let Err(e) = store.initialize().await {
                log::warn!("starting signed out [{}]: {e}", e.error_code());
            }
        });
    }

    provide_context(store);
    provide_context(session);
    provide_context(ui);

    view! {
        <Title text="BlogCMS"/>
        <NoticeBanner/>

        <Router>
            <Routes fallback=UnknownRoute>
                <Route path=StaticSegment("") view=|| view! { <RouteGate><LandingPage/></RouteGate> }/>
                <Route path=StaticSegment("login") view=|| view! { <RouteGate><LoginPage/></RouteGate> }/>
                <Route path=StaticSegment("register") view=|| view! { <RouteGate><RegisterPage/></RouteGate> }/>
                <Route
                    path=StaticSegment("dashboard")
                    view=|| view! { <RouteGate><AdminDashboardPage/></RouteGate> }
                />
                <Route
                    path=(StaticSegment("dashboard"), StaticSegment("settings"))
                    view=|| view! { <RouteGate><SettingsPage/></RouteGate> }
                />
                <Route
                    path=StaticSegment("editor")
                    view=|| view! { <RouteGate><EditorDashboardPage/></RouteGate> }
                />
                <Route
                    path=(StaticSegment("editor"), StaticSegment("settings"))
                    view=|| view! { <RouteGate><SettingsPage/></RouteGate> }
                />
            </Routes>
        </Router>
    }
}
