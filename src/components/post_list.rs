//! Searchable, category-filtered post table with edit and delete actions.

use leptos::prelude::*;

use crate::state::posts::{PostStatus, PostsState};
use crate::state::ui::UiState;
use crate::util::time::format_date;

#[component]
pub fn PostList(posts: RwSignal<PostsState>) -> impl IntoView {
    let ui = expect_context::<RwSignal<UiState>>();

    let rows = move || {
        posts.with(|state| {
            state
                .filtered()
                .into_iter()
                .map(|post| (post.clone(), state.category_name(post.category_id).to_owned()))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <section class="post-list">
            <div class="post-list__filters">
                <input
                    class="post-list__search"
                    type="search"
                    placeholder="Search posts..."
                    prop:value=move || posts.with(|p| p.search.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        posts.update(|p| p.search = value);
                    }
                />
                <select
                    class="post-list__category"
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        posts.update(|p| p.category_filter = value.parse().ok());
                    }
                >
                    <option value="" selected=move || posts.with(|p| p.category_filter.is_none())>"All categories"</option>
                    {move || {
                        posts
                            .with(|p| p.categories.clone())
                            .into_iter()
                            .map(|category| {
                                let id = category.id;
                                view! {
                                    <option
                                        value=id.to_string()
                                        selected=move || posts.with(|p| p.category_filter == Some(id))
                                    >
                                        {category.name}
                                    </option>
                                }
                            })
                            .collect_view()
                    }}
                </select>
            </div>
            <Show
                when=move || posts.with(|p| !p.filtered().is_empty())
                fallback=|| view! { <p class="post-list__empty">"No posts found."</p> }
            >
                <ul class="post-list__items">
                    <For
                        each=rows
                        key=|(post, _)| (post.id, post.updated_at.clone())
                        children=move |(post, category)| {
                            let id = post.id;
                            let published = post.status == PostStatus::Published;
                            view! {
                                <li class="post-row">
                                    <div class="post-row__main">
                                        <h3 class="post-row__title">{post.title}</h3>
                                        <p class="post-row__excerpt">{post.excerpt}</p>
                                    </div>
                                    <div class="post-row__meta">
                                        <span class="post-row__category">{category}</span>
                                        <span class="post-row__status" class:post-row__status--published=published>
                                            {post.status.as_str()}
                                        </span>
                                        <span class="post-row__date">{format_date(&post.created_at)}</span>
                                        <span class="post-row__updated">"Updated " {format_date(&post.updated_at)}</span>
                                    </div>
                                    <div class="post-row__actions">
                                        <button
                                            type="button"
                                            on:click=move |_| {
                                                let opened = posts.try_update(|p| p.begin_edit(id));
                                                if let Some(Err(e)) = opened {
                                                    ui.update(|u| u.error(e.to_string()));
                                                }
                                            }
                                        >
                                            "Edit"
                                        </button>
                                        <button
                                            type="button"
                                            class="post-row__delete"
                                            on:click=move |_| {
                                                if posts.try_update(|p| p.delete(id)).unwrap_or(false) {
                                                    ui.update(|u| u.success("Post deleted successfully"));
                                                }
                                            }
                                        >
                                            "Delete"
                                        </button>
                                    </div>
                                </li>
                            }
                        }
                    />
                </ul>
            </Show>
        </section>
    }
}
