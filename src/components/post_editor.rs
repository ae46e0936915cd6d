//! Create/edit form for a single post with a Markdown preview.
//!
//! DESIGN
//! ======
//! Form fields are local signals seeded from `PostsState::editing`. Saving
//! hands a `PostDraft` back to `PostsState::save`, which owns all validation,
//! so the editor stays a thin view.

#[cfg(test)]
#[path = "post_editor_test.rs"]
mod post_editor_test;

use leptos::prelude::*;

use crate::state::posts::{PostDraft, PostStatus, PostsState};
use crate::state::ui::UiState;
use crate::util::markdown::render_html;
use crate::util::time::now_iso;

/// Build a draft from raw form values. An unparseable category means "use
/// the default category".
fn draft_from_form(id: Option<u32>, title: &str, excerpt: &str, content: &str, category: &str, status: &str) -> PostDraft {
    PostDraft {
        id,
        title: title.to_owned(),
        content: content.to_owned(),
        excerpt: excerpt.to_owned(),
        category_id: category.trim().parse().ok(),
        status: PostStatus::parse(status),
    }
}

fn saved_message(id: Option<u32>) -> &'static str {
    if id.is_some() { "Post updated successfully" } else { "Post created successfully" }
}

#[component]
pub fn PostEditor(posts: RwSignal<PostsState>) -> impl IntoView {
    let ui = expect_context::<RwSignal<UiState>>();
    let initial = posts.with_untracked(|p| p.editing.clone()).unwrap_or_default();
    let editing_id = initial.id;

    let title = RwSignal::new(initial.title);
    let excerpt = RwSignal::new(initial.excerpt);
    let content = RwSignal::new(initial.content);
    let category = RwSignal::new(initial.category_id.map(|id| id.to_string()).unwrap_or_default());
    let status = RwSignal::new(initial.status.as_str().to_owned());
    let preview = RwSignal::new(false);
    let error = RwSignal::new(String::new());

    let on_save = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let draft = draft_from_form(
            editing_id,
            &title.get_untracked(),
            &excerpt.get_untracked(),
            &content.get_untracked(),
            &category.get_untracked(),
            &status.get_untracked(),
        );
        match posts.try_update(|p| p.save(draft, &now_iso())) {
            Some(Ok(id)) => {
                log::info!("saved post {id}");
                ui.update(|u| u.success(saved_message(editing_id)));
            }
            Some(Err(e)) => error.set(e.to_string()),
            None => {}
        }
    };

    let on_cancel = move |_| posts.update(PostsState::cancel_edit);

    view! {
        <form class="post-editor" on:submit=on_save>
            <header class="post-editor__header">
                <button type="button" class="post-editor__back" on:click=on_cancel>"Back"</button>
                <h2>{if editing_id.is_some() { "Edit Post" } else { "Create New Post" }}</h2>
                <button type="submit" class="post-editor__save">"Save"</button>
            </header>
            <Show when=move || !error.get().is_empty()>
                <p class="post-editor__error" role="alert">{move || error.get()}</p>
            </Show>
            <label class="post-editor__field">
                "Title"
                <input
                    type="text"
                    placeholder="Enter post title..."
                    prop:value=move || title.get()
                    on:input=move |ev| title.set(event_target_value(&ev))
                />
            </label>
            <label class="post-editor__field">
                "Excerpt"
                <textarea
                    placeholder="Short summary (generated from the content when empty)"
                    prop:value=move || excerpt.get()
                    on:input=move |ev| excerpt.set(event_target_value(&ev))
                ></textarea>
            </label>
            <div class="post-editor__row">
                <label class="post-editor__field">
                    "Category"
                    <select on:change=move |ev| category.set(event_target_value(&ev))>
                        <option value="" selected=move || category.get().is_empty()>"Default"</option>
                        {posts
                            .with_untracked(|p| p.categories.clone())
                            .into_iter()
                            .map(|c| {
                                let value = c.id.to_string();
                                let current = value.clone();
                                view! {
                                    <option value=value selected=move || category.get() == current>
                                        {c.name}
                                    </option>
                                }
                            })
                            .collect_view()}
                    </select>
                </label>
                <label class="post-editor__field">
                    "Status"
                    <select on:change=move |ev| status.set(event_target_value(&ev))>
                        <option value="draft" selected=move || status.get() == "draft">"Draft"</option>
                        <option value="published" selected=move || status.get() == "published">"Published"</option>
                    </select>
                </label>
            </div>
            <div class="post-editor__tabs">
                <button type="button" class:active=move || !preview.get() on:click=move |_| preview.set(false)>
                    "Write"
                </button>
                <button type="button" class:active=move || preview.get() on:click=move |_| preview.set(true)>
                    "Preview"
                </button>
            </div>
            <Show
                when=move || preview.get()
                fallback=move || {
                    view! {
                        <textarea
                            class="post-editor__content"
                            placeholder="Write your post in Markdown..."
                            prop:value=move || content.get()
                            on:input=move |ev| content.set(event_target_value(&ev))
                        ></textarea>
                    }
                }
            >
                <div class="post-editor__preview" inner_html=move || render_html(&content.get())></div>
            </Show>
        </form>
    }
}
