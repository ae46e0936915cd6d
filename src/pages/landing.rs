//! Public landing page.

use leptos::prelude::*;

use crate::util::route_guard::{LOGIN_PATH, REGISTER_PATH};

const FEATURES: [(&str, &str); 6] = [
    ("Lightning Fast", "Compiled to WebAssembly for optimal performance and speed"),
    ("Secure by Default", "Role-based access control and secure authentication"),
    ("Markdown Editor", "Write in Markdown with a live preview"),
    ("Team Collaboration", "Admin and editor roles for seamless team workflows"),
    ("Developer Friendly", "Typed state, clean API, and a modern architecture"),
    ("Responsive Design", "A clean UI that works on any device"),
];

#[component]
pub fn LandingPage() -> impl IntoView {
    view! {
        <div class="landing-page">
            <header class="landing-page__nav">
                <span class="landing-page__brand">"BlogCMS"</span>
                <nav>
                    <a href=LOGIN_PATH>"Sign in"</a>
                    <a href=REGISTER_PATH class="landing-page__cta">"Get started"</a>
                </nav>
            </header>
            <section class="landing-page__hero">
                <p class="landing-page__eyebrow">"CONTENT MANAGEMENT"</p>
                <h1>"Next-Gen Content Management"</h1>
                <p>"Write, organize, and publish posts with a workflow built for admins and editors."</p>
                <a href=REGISTER_PATH class="landing-page__cta">"Create an account"</a>
                <p class="landing-page__note">"No credit card required. Free for editors."</p>
            </section>
            <section class="landing-page__features">
                {FEATURES
                    .into_iter()
                    .map(|(title, description)| {
                        view! {
                            <article class="feature-card">
                                <h3>{title}</h3>
                                <p>{description}</p>
                            </article>
                        }
                    })
                    .collect_view()}
            </section>
        </div>
    }
}
