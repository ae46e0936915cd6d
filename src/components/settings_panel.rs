//! Settings form: profile, preferences, and the admin-only blog section.

use leptos::prelude::*;

use crate::state::auth::Identity;
use crate::state::settings::Settings;
use crate::state::ui::UiState;
use crate::util::theme::{self, ThemePreference};

#[component]
pub fn SettingsPanel(identity: Identity) -> impl IntoView {
    let ui = expect_context::<RwSignal<UiState>>();
    let settings = RwSignal::new(Settings::load(&identity));
    let error = RwSignal::new(String::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let mut current = settings.get_untracked();
        match current.save(&identity) {
            Ok(()) => {
                error.set(String::new());
                settings.set(current.clone());
                let theme = current.preferences.theme.resolve(theme::system_prefers_dark());
                theme::set(theme);
                ui.update(|u| {
                    u.theme = theme;
                    u.success("Settings saved successfully");
                });
            }
            Err(e) => error.set(e.to_string()),
        }
    };

    let blog_section = move || {
        settings.with(|s| s.blog.is_some()).then(|| {
            view! {
                <fieldset class="settings-panel__section">
                    <legend>"Blog"</legend>
                    <label>
                        "Blog title"
                        <input
                            type="text"
                            prop:value=move || settings.with(|s| s.blog.as_ref().map(|b| b.title.clone()).unwrap_or_default())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                settings.update(|s| {
                                    if let Some(blog) = s.blog.as_mut() {
                                        blog.title = value;
                                    }
                                });
                            }
                        />
                    </label>
                    <label>
                        "Description"
                        <textarea
                            prop:value=move || settings.with(|s| s.blog.as_ref().map(|b| b.description.clone()).unwrap_or_default())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                settings.update(|s| {
                                    if let Some(blog) = s.blog.as_mut() {
                                        blog.description = value;
                                    }
                                });
                            }
                        ></textarea>
                    </label>
                    <label>
                        "Posts per page"
                        <input
                            type="number"
                            min="1"
                            max="100"
                            prop:value=move || settings.with(|s| s.blog.as_ref().map_or(0, |b| b.posts_per_page).to_string())
                            on:input=move |ev| {
                                let value = event_target_value(&ev).trim().parse().unwrap_or(0);
                                settings.update(|s| {
                                    if let Some(blog) = s.blog.as_mut() {
                                        blog.posts_per_page = value;
                                    }
                                });
                            }
                        />
                    </label>
                    <label class="settings-panel__toggle">
                        <input
                            type="checkbox"
                            prop:checked=move || settings.with(|s| s.blog.as_ref().is_some_and(|b| b.allow_comments))
                            on:change=move |ev| {
                                let checked = event_target_checked(&ev);
                                settings.update(|s| {
                                    if let Some(blog) = s.blog.as_mut() {
                                        blog.allow_comments = checked;
                                    }
                                });
                            }
                        />
                        "Allow comments"
                    </label>
                </fieldset>
            }
        })
    };

    view! {
        <form class="settings-panel" on:submit=on_submit>
            <h2>"Settings"</h2>
            <Show when=move || !error.get().is_empty()>
                <p class="settings-panel__error" role="alert">{move || error.get()}</p>
            </Show>
            <fieldset class="settings-panel__section">
                <legend>"Profile"</legend>
                <label>
                    "Name"
                    <input
                        type="text"
                        prop:value=move || settings.with(|s| s.profile.name.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            settings.update(|s| s.profile.name = value);
                        }
                    />
                </label>
                <label>
                    "Email"
                    <input
                        type="email"
                        prop:value=move || settings.with(|s| s.profile.email.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            settings.update(|s| s.profile.email = value);
                        }
                    />
                </label>
                <label>
                    "Avatar URL"
                    <input
                        type="url"
                        prop:value=move || settings.with(|s| s.profile.avatar_url.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            settings.update(|s| s.profile.avatar_url = value);
                        }
                    />
                </label>
            </fieldset>
            <fieldset class="settings-panel__section">
                <legend>"Preferences"</legend>
                <label>
                    "Theme"
                    <select on:change=move |ev| {
                        let value = ThemePreference::parse(&event_target_value(&ev));
                        settings.update(|s| s.preferences.theme = value);
                    }>
                        {[ThemePreference::System, ThemePreference::Light, ThemePreference::Dark]
                            .into_iter()
                            .map(|pref| {
                                view! {
                                    <option
                                        value=pref.as_str()
                                        selected=move || settings.with(|s| s.preferences.theme == pref)
                                    >
                                        {pref.as_str()}
                                    </option>
                                }
                            })
                            .collect_view()}
                    </select>
                </label>
                <label class="settings-panel__toggle">
                    <input
                        type="checkbox"
                        prop:checked=move || settings.with(|s| s.preferences.notifications)
                        on:change=move |ev| {
                            let checked = event_target_checked(&ev);
                            settings.update(|s| s.preferences.notifications = checked);
                        }
                    />
                    "Notifications"
                </label>
                <label class="settings-panel__toggle">
                    <input
                        type="checkbox"
                        prop:checked=move || settings.with(|s| s.preferences.email_notifications)
                        on:change=move |ev| {
                            let checked = event_target_checked(&ev);
                            settings.update(|s| s.preferences.email_notifications = checked);
                        }
                    />
                    "Email notifications"
                </label>
            </fieldset>
            {blog_section}
            <button type="submit" class="settings-panel__save">"Save changes"</button>
        </form>
    }
}
