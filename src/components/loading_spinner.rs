use leptos::prelude::*;

/// Full-page spinner shown while the session is being resolved.
#[component]
pub fn LoadingSpinner(#[prop(optional, into)] label: Option<String>) -> impl IntoView {
    let label = label.unwrap_or_else(|| "Loading...".to_owned());
    view! {
        <div class="loading-spinner" role="status" aria-live="polite">
            <div class="loading-spinner__ring"></div>
            <p class="loading-spinner__label">{label}</p>
        </div>
    }
}
