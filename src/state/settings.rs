//! Account, preference, and (admin-only) blog settings.
//!
//! Settings are kept per user and role in `localStorage`. A user without
//! saved settings starts from the signed-in identity; a stored blob owned by
//! another user is never shown.

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use serde::{Deserialize, Serialize};

use super::auth::{Identity, Role, normalize_email};
use crate::util::storage;
use crate::util::theme::ThemePreference;

pub const MAX_POSTS_PER_PAGE: u32 = 100;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSettings {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar_url: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub theme: ThemePreference,
    pub notifications: bool,
    pub email_notifications: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self { theme: ThemePreference::System, notifications: true, email_notifications: true }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogSettings {
    pub title: String,
    pub description: String,
    pub posts_per_page: u32,
    pub allow_comments: bool,
}

impl Default for BlogSettings {
    fn default() -> Self {
        Self {
            title: "My Awesome Blog".to_owned(),
            description: "A blog about interesting things".to_owned(),
            posts_per_page: 10,
            allow_comments: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Provider user id the settings belong to.
    #[serde(default)]
    pub owner: String,
    pub profile: ProfileSettings,
    #[serde(default)]
    pub preferences: Preferences,
    /// Present for admins only.
    #[serde(default)]
    pub blog: Option<BlogSettings>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("name is required")]
    EmptyName,
    #[error("enter a valid email address")]
    InvalidEmail,
    #[error("posts per page must be between 1 and {MAX_POSTS_PER_PAGE}")]
    PostsPerPageOutOfRange(u32),
    #[error("blog title is required")]
    EmptyBlogTitle,
}

impl SettingsError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::InvalidEmail => "E_SETTINGS_PROFILE",
            Self::PostsPerPageOutOfRange(_) | Self::EmptyBlogTitle => "E_SETTINGS_BLOG",
        }
    }
}

/// `localStorage` key for one user's saved settings.
#[must_use]
pub fn storage_key(identity: &Identity) -> String {
    format!("blogcms.settings.{}.{}", identity.role.as_str(), identity.id)
}

impl Settings {
    /// Defaults for `identity`: profile from the identity, blog section for admins.
    #[must_use]
    pub fn for_identity(identity: &Identity) -> Self {
        Self {
            owner: identity.id.clone(),
            profile: ProfileSettings {
                name: identity.display_name.clone(),
                email: identity.email.clone(),
                avatar_url: String::new(),
            },
            preferences: Preferences::default(),
            blog: (identity.role == Role::Admin).then(BlogSettings::default),
        }
    }

    /// Saved settings for `identity`, or its defaults.
    #[must_use]
    pub fn load(identity: &Identity) -> Self {
        Self::from_stored(storage::load_json::<Self>(&storage_key(identity)), identity)
    }

    /// Reconcile a stored blob with the signed-in identity. A blob owned by
    /// anyone else is discarded in favour of the identity's defaults.
    #[must_use]
    pub fn from_stored(stored: Option<Self>, identity: &Identity) -> Self {
        let mut settings = match stored {
            Some(stored) if stored.owner == identity.id => stored,
            Some(stored) => {
                log::warn!("ignoring settings saved for another user ({})", stored.owner);
                Self::for_identity(identity)
            }
            None => Self::for_identity(identity),
        };
        settings.match_role(identity.role);
        settings
    }

    /// Validate and persist for `identity`.
    ///
    /// # Errors
    ///
    /// Returns the first [`SettingsError`] found; nothing is written then.
    pub fn save(&mut self, identity: &Identity) -> Result<(), SettingsError> {
        self.validate()?;
        self.owner.clone_from(&identity.id);
        storage::save_json(&storage_key(identity), self);
        log::info!("settings saved for {} ({})", identity.id, identity.role.as_str());
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the first invalid field.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.profile.name.trim().is_empty() {
            return Err(SettingsError::EmptyName);
        }
        normalize_email(&self.profile.email).map_err(|_| SettingsError::InvalidEmail)?;
        if let Some(blog) = &self.blog {
            if !(1..=MAX_POSTS_PER_PAGE).contains(&blog.posts_per_page) {
                return Err(SettingsError::PostsPerPageOutOfRange(blog.posts_per_page));
            }
            if blog.title.trim().is_empty() {
                return Err(SettingsError::EmptyBlogTitle);
            }
        }
        Ok(())
    }

    fn match_role(&mut self, role: Role) {
        match role {
            Role::Admin if self.blog.is_none() => self.blog = Some(BlogSettings::default()),
            Role::Editor => self.blog = None,
            Role::Admin => {}
        }
    }
}
