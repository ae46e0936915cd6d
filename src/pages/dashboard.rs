//! Admin and editor dashboards.
//!
//! SYSTEM CONTEXT
//! ==============
//! Both routes render the same catalog view over a role-specific starter
//! catalog. The route guard has already checked the role by the time either
//! page mounts.

use leptos::prelude::*;

use crate::components::post_editor::PostEditor;
use crate::components::post_list::PostList;
use crate::components::site_header::SiteHeader;
use crate::components::stats_cards::StatsCards;
use crate::state::auth::Role;
use crate::state::posts::PostsState;
use crate::state::seed;

#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    view! { <DashboardView role=Role::Admin/> }
}

#[component]
pub fn EditorDashboardPage() -> impl IntoView {
    view! { <DashboardView role=Role::Editor/> }
}

fn dashboard_title(role: Role) -> &'static str {
    match role {
        Role::Admin => "Admin Dashboard",
        Role::Editor => "Editor Dashboard",
    }
}

#[component]
fn DashboardView(role: Role) -> impl IntoView {
    let posts = RwSignal::new(seed::catalog_for(role));
    let stats = Signal::derive(move || posts.with(PostsState::stats));
    let editing = move || posts.with(|p| p.editing.is_some());

    view! {
        <div class="dashboard-page">
            <SiteHeader title=dashboard_title(role)/>
            <main class="dashboard-page__body">
                <Show
                    when=editing
                    fallback=move || {
                        view! {
                            <StatsCards stats=stats/>
                            <div class="dashboard-page__toolbar">
                                <h2>"Posts"</h2>
                                <button
                                    class="dashboard-page__new"
                                    type="button"
                                    on:click=move |_| posts.update(PostsState::begin_create)
                                >
                                    "New Post"
                                </button>
                            </div>
                            <PostList posts=posts/>
                        }
                    }
                >
                    <PostEditor posts=posts/>
                </Show>
            </main>
        </div>
    }
}
