use leptos::prelude::*;

use crate::state::ui::{NoticeKind, UiState};

/// Dismissible one-line feedback for the last action.
#[component]
pub fn NoticeBanner() -> impl IntoView {
    let ui = expect_context::<RwSignal<UiState>>();
    let notice = move || ui.with(|u| u.notice.clone());

    view! {
        {move || {
            notice()
                .map(|n| {
                    let error = n.kind == NoticeKind::Error;
                    view! {
                        <div
                            class="notice"
                            class:notice--error=error
                            class:notice--success=!error
                            role=if error { "alert" } else { "status" }
                        >
                            <span class="notice__message">{n.message}</span>
                            <button class="notice__close" type="button" on:click=move |_| ui.update(UiState::dismiss)>
                                "×"
                            </button>
                        </div>
                    }
                })
        }}
    }
}
