//! Route wrapper applying `authorize` to the current location.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every `<Route>` view in `App` is wrapped in `RouteGate`. The gate re-runs
//! the guard whenever the session signal, path, or `next` query changes:
//! `Pending` shows the spinner, `Redirect` performs a replace-navigation, and
//! `Render` mounts the page.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate, use_query_map};

use crate::components::loading_spinner::LoadingSpinner;
use crate::state::auth::Session;
use crate::util::route_guard::{RESUME_PARAM, RouteDecision, RouteRequest, authorize};

#[component]
pub fn RouteGate(children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    let location = use_location();
    let query = use_query_map();
    let navigate = use_navigate();

    let decision = Memo::new(move |_| {
        let request = RouteRequest::new(location.pathname.get()).with_resume(query.with(|q| q.get(RESUME_PARAM)));
        session.with(|s| authorize(s, &request))
    });

    Effect::new(move || {
        if let RouteDecision::Redirect(redirect) = decision.get() {
            let href = redirect.href();
            log::debug!("route guard redirecting to {href}");
            navigate(&href, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    view! {
        <Show
            when=move || matches!(decision.get(), RouteDecision::Render(_))
            fallback=|| view! { <LoadingSpinner/> }
        >
            {children()}
        </Show>
    }
}

/// Router fallback: the guard sends unknown paths to the landing page.
#[component]
pub fn UnknownRoute() -> impl IntoView {
    view! {
        <RouteGate>
            <p class="route-gate__missing">"Page not found."</p>
        </RouteGate>
    }
}
