//! Registration page with role selection.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;

use crate::state::auth::{AuthError, MIN_PASSWORD_LEN, Role};
use crate::state::session_store::{Registration, SessionStore};
use crate::state::ui::{NoticeKind, UiState};
use crate::util::liveness::Liveness;
use crate::util::route_guard::LOGIN_PATH;

const PASSWORD_MISMATCH: &str = "passwords do not match";

/// Local check run before the store's own validation.
fn check_confirmation(password: &str, confirm: &str) -> Result<(), &'static str> {
    if password == confirm { Ok(()) } else { Err(PASSWORD_MISMATCH) }
}

/// User-facing outcome of a registration attempt.
fn registration_outcome(result: &Result<Registration, AuthError>) -> (NoticeKind, String) {
    match result {
        Ok(Registration::ProfileCreated) => (NoticeKind::Success, "Account created successfully!".to_owned()),
        Ok(Registration::AwaitingConfirmation) => (
            NoticeKind::Success,
            "Check your email to confirm your account, then sign in.".to_owned(),
        ),
        Err(AuthError::ProfileInconsistency { .. }) => (
            NoticeKind::Error,
            "Your account was created but your profile could not be saved. Please contact an administrator.".to_owned(),
        ),
        Err(AuthError::Validation(e)) => (NoticeKind::Error, e.to_string()),
        Err(other) => (NoticeKind::Error, format!("Registration failed: {other}")),
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let store = expect_context::<SessionStore>();
    let ui = expect_context::<RwSignal<UiState>>();

    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let role = RwSignal::new(Role::Editor);
    let busy = RwSignal::new(false);
    let info = RwSignal::new(None::<(NoticeKind, String)>);

    let alive = Liveness::new();
    on_cleanup({
        let alive = alive.clone();
        move || alive.retire()
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        if let Err(msg) = check_confirmation(&password.get_untracked(), &confirm.get_untracked()) {
            info.set(Some((NoticeKind::Error, msg.to_owned())));
            return;
        }
        busy.set(true);
        info.set(None);
        let (name_value, email_value, password_value) = (name.get_untracked(), email.get_untracked(), password.get_untracked());
        let role_value = role.get_untracked();

        #[cfg(feature = "csr")]
        {
            let store = store.clone();
            let alive = alive.clone();
            leptos::task::spawn_local(async move {
                let result = store.register(&name_value, &email_value, &password_value, role_value).await;
                let outcome = registration_outcome(&result);
                ui.update(|u| match outcome.0 {
                    NoticeKind::Success => u.success(outcome.1.clone()),
                    NoticeKind::Error => u.error(outcome.1.clone()),
                });
                alive.run_if_alive(|| {
                    info.set(Some(outcome));
                    busy.set(false);
                });
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (&store, &alive, ui, name_value, email_value, password_value, role_value);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Create your account"</h1>
                <p class="login-card__subtitle">"Start publishing in minutes"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        placeholder="Full name"
                        prop:value=move || name.get()
                        on:input=move |ev| name.set(event_target_value(&ev))
                    />
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
                        placeholder=format!("Password (at least {MIN_PASSWORD_LEN} characters)")
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Confirm password"
                        prop:value=move || confirm.get()
                        on:input=move |ev| confirm.set(event_target_value(&ev))
                    />
                    <select
                        class="login-input"
                        on:change=move |ev| role.set(Role::parse(Some(&event_target_value(&ev))))
                    >
                        <option value="editor" selected=move || role.get() == Role::Editor>"Editor"</option>
                        <option value="admin" selected=move || role.get() == Role::Admin>"Admin"</option>
                    </select>
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Creating account..." } else { "Create account" }}
                    </button>
                </form>
                {move || {
                    info.get()
                        .map(|(kind, message)| {
                            view! {
                                <p class="login-message" class:login-message--error=kind == NoticeKind::Error>
                                    {message}
                                </p>
                            }
                        })
                }}
                <p class="login-card__footer">
                    "Already have an account? "
                    <a href=LOGIN_PATH>"Sign in"</a>
                </p>
            </div>
        </div>
    }
}
