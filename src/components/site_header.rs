//! Dashboard header: identity, navigation, theme toggle, and sign-out.

use leptos::prelude::*;

use crate::state::auth::{Role, Session};
use crate::state::session_store::SessionStore;
use crate::state::ui::UiState;
use crate::util::liveness::Liveness;
use crate::util::theme::{self, Theme};

#[component]
pub fn SiteHeader(#[prop(into)] title: String) -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    let ui = expect_context::<RwSignal<UiState>>();
    let store = expect_context::<SessionStore>();
    let busy = RwSignal::new(false);

    let alive = Liveness::new();
    on_cleanup({
        let alive = alive.clone();
        move || alive.retire()
    });

    let identity = move || session.with(|s| s.resolved_identity().cloned());
    let role = move || identity().map_or(Role::Editor, |i| i.role);

    let on_toggle_theme = move |_| ui.update(|u| u.theme = theme::toggle(u.theme));

    let on_logout = move |_| {
        if busy.get_untracked() {
            return;
        }
        busy.set(true);
        #[cfg(feature = "csr")]
        {
            let store = store.clone();
            let alive = alive.clone();
            leptos::task::spawn_local(async move {
                let result = store.logout().await;
                match result {
                    Ok(()) => ui.update(|u| u.success("Logged out successfully")),
                    Err(e) => ui.update(|u| u.error(format!("Failed to log out: {e}"))),
                }
                alive.run_if_alive(|| busy.set(false));
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (&store, &alive);
        }
    };

    view! {
        <header class="site-header">
            <div class="site-header__brand">
                <span class="site-header__logo">"BlogCMS"</span>
                <span class="site-header__title">{title}</span>
            </div>
            <nav class="site-header__nav">
                <a href=move || role().home_path()>"Posts"</a>
                <a href=move || role().settings_path()>"Settings"</a>
            </nav>
            <div class="site-header__user">
                <span class="site-header__name">{move || identity().map(|i| i.display_name).unwrap_or_default()}</span>
                <span class="site-header__role">{move || role().as_str()}</span>
                <button class="site-header__theme" type="button" on:click=on_toggle_theme>
                    {move || if ui.with(|u| u.theme) == Theme::Dark { "Light mode" } else { "Dark mode" }}
                </button>
                <button class="site-header__logout" type="button" disabled=move || busy.get() on:click=on_logout>
                    "Log out"
                </button>
            </div>
        </header>
    }
}
