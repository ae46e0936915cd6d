use leptos::prelude::*;

use crate::state::posts::PostStats;

/// Four dashboard counters.
#[component]
pub fn StatsCards(#[prop(into)] stats: Signal<PostStats>) -> impl IntoView {
    let card = move |label: &'static str, value: fn(&PostStats) -> usize| {
        view! {
            <div class="stats-card">
                <span class="stats-card__label">{label}</span>
                <span class="stats-card__value">{move || stats.with(value)}</span>
            </div>
        }
    };

    view! {
        <section class="stats-cards">
            {card("Total Posts", |s| s.total)}
            {card("Published", |s| s.published)}
            {card("Drafts", |s| s.drafts)}
            {card("Categories", |s| s.categories)}
        </section>
    }
}
