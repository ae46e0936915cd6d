//! Login page: email + password, or Google OAuth.
//!
//! A successful sign-in does not navigate by itself. The provider's
//! session-change notification updates the session signal and `RouteGate`
//! then redirects to the role home (or the `next` target).

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::state::auth::AuthError;
use crate::state::session_store::SessionStore;
use crate::state::ui::UiState;
use crate::util::liveness::Liveness;
use crate::util::route_guard::{REGISTER_PATH, RESUME_PARAM};

/// Where the OAuth provider sends the browser back to.
///
/// Landing on `/login` lets the guard apply the same `next` handling as a
/// password sign-in.
fn oauth_return_url(origin: &str, resume: Option<&str>) -> String {
    match resume {
        Some(next) => format!("{origin}/login?{RESUME_PARAM}={}", urlencoding::encode(next)),
        None => format!("{origin}/login"),
    }
}

fn login_error_message(err: &AuthError) -> String {
    match err {
        AuthError::Validation(e) => e.to_string(),
        other => format!("Login failed: {other}"),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let store = expect_context::<SessionStore>();
    let ui = expect_context::<RwSignal<UiState>>();
    let query = use_query_map();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let info = RwSignal::new(String::new());

    let alive = Liveness::new();
    on_cleanup({
        let alive = alive.clone();
        move || alive.retire()
    });

    let on_submit = {
        let store = store.clone();
        let alive = alive.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            if busy.get_untracked() {
                return;
            }
            busy.set(true);
            info.set(String::new());
            let email_value = email.get_untracked();
            let password_value = password.get_untracked();

            #[cfg(feature = "csr")]
            {
                let store = store.clone();
                let alive = alive.clone();
                leptos::task::spawn_local(async move {
                    let result = store.login(&email_value, &password_value).await;
                    if let Err(e) = &result {
                        ui.update(|u| u.error(login_error_message(e)));
                    } else {
                        ui.update(|u| u.success("Welcome back!"));
                    }
                    alive.run_if_alive(|| {
                        if let Err(e) = result {
                            info.set(login_error_message(&e));
                        }
                        busy.set(false);
                    });
                });
            }
            #[cfg(not(feature = "csr"))]
            {
                let _ = (&store, &alive, email_value, password_value);
            }
        }
    };

    let on_google = move |_| {
        let resume = query.with_untracked(|q| q.get(RESUME_PARAM));
        #[cfg(feature = "csr")]
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let origin = window.location().origin().unwrap_or_default();
            let target = oauth_return_url(&origin, resume.as_deref());
            match store.sign_in_with_oauth(crate::net::provider::OAuthProvider::Google, &target) {
                Ok(url) => {
                    let _ = window.location().set_href(&url);
                }
                Err(e) => ui.update(|u| u.error(format!("Failed to sign in with Google: {e}"))),
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (&store, resume);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Welcome back"</h1>
                <p class="login-card__subtitle">"Sign in to manage your content"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message" role="alert">{move || info.get()}</p>
                </Show>
                <div class="login-divider"></div>
                <button class="login-button login-button--google" type="button" on:click=on_google>
                    "Continue with Google"
                </button>
                <p class="login-card__footer">
                    "Don't have an account? "
                    <a href=REGISTER_PATH>"Sign up"</a>
                </p>
            </div>
        </div>
    }
}
