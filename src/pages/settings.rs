use leptos::prelude::*;

use crate::components::settings_panel::SettingsPanel;
use crate::components::site_header::SiteHeader;
use crate::state::auth::Session;

/// Settings route for either role; the guard picks which path is allowed.
#[component]
pub fn SettingsPage() -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    let identity = move || session.with(|s| s.resolved_identity().cloned());

    view! {
        <div class="dashboard-page">
            <SiteHeader title="Settings"/>
            <main class="dashboard-page__body">
                {move || identity().map(|identity| view! { <SettingsPanel identity=identity/> })}
            </main>
        </div>
    }
}
