use super::*;

fn identity(role: &str) -> Identity {
    Identity::from_parts("u1", Some("ada@example.com"), Some("Ada"), Some(role))
}

fn grace(role: &str) -> Identity {
    Identity::from_parts("u2", Some("grace@example.com"), Some("Grace"), Some(role))
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn admin_defaults_include_blog_section() {
    let settings = Settings::for_identity(&identity("admin"));
    assert_eq!(settings.profile.name, "Ada");
    assert_eq!(settings.profile.email, "ada@example.com");
    assert_eq!(settings.preferences.theme, ThemePreference::System);
    assert_eq!(settings.blog.as_ref().map(|b| b.posts_per_page), Some(10));
}

#[test]
fn editor_defaults_have_no_blog_section() {
    assert!(Settings::for_identity(&identity("editor")).blog.is_none());
}

#[test]
fn load_without_storage_uses_identity_defaults() {
    let who = identity("editor");
    assert_eq!(Settings::load(&who), Settings::for_identity(&who));
}

#[test]
fn storage_keys_are_per_user_and_role() {
    assert_eq!(storage_key(&identity("admin")), "blogcms.settings.admin.u1");
    assert_eq!(storage_key(&identity("editor")), "blogcms.settings.editor.u1");
    assert_ne!(storage_key(&identity("admin")), storage_key(&grace("admin")));
}

// =============================================================
// Ownership
// =============================================================

#[test]
fn defaults_record_their_owner() {
    assert_eq!(Settings::for_identity(&identity("admin")).owner, "u1");
}

#[test]
fn two_admins_never_see_each_others_profile() {
    let ada = identity("admin");
    let other = grace("admin");

    let mut saved = Settings::for_identity(&ada);
    saved.profile.avatar_url = "https://example.com/ada.png".to_owned();

    let loaded = Settings::from_stored(Some(saved.clone()), &other);
    assert_eq!(loaded, Settings::for_identity(&other));
    assert_eq!(loaded.profile.email, "grace@example.com");

    assert_eq!(Settings::from_stored(Some(saved.clone()), &ada), saved);
}

#[test]
fn blob_without_owner_is_not_trusted() {
    let raw = r#"{"profile":{"name":"Someone","email":"someone@example.com"}}"#;
    let stored: Settings = serde_json::from_str(raw).unwrap();
    let who = identity("editor");
    assert_eq!(Settings::from_stored(Some(stored), &who), Settings::for_identity(&who));
}

#[test]
fn save_stamps_the_saving_user() {
    let mut settings = Settings::for_identity(&identity("editor"));
    settings.owner = String::new();
    assert_eq!(settings.save(&grace("editor")), Ok(()));
    assert_eq!(settings.owner, "u2");
}

// =============================================================
// Validation
// =============================================================

#[test]
fn validate_accepts_defaults() {
    assert_eq!(Settings::for_identity(&identity("admin")).validate(), Ok(()));
    let who = identity("editor");
    assert_eq!(Settings::for_identity(&who).save(&who), Ok(()));
}

#[test]
fn validate_rejects_blank_name_and_bad_email() {
    let mut settings = Settings::for_identity(&identity("editor"));
    settings.profile.name = " ".to_owned();
    assert_eq!(settings.validate(), Err(SettingsError::EmptyName));

    settings.profile.name = "Ada".to_owned();
    settings.profile.email = "ada.example.com".to_owned();
    assert_eq!(settings.validate(), Err(SettingsError::InvalidEmail));
}

#[test]
fn validate_checks_blog_fields() {
    let mut settings = Settings::for_identity(&identity("admin"));
    if let Some(blog) = settings.blog.as_mut() {
        blog.posts_per_page = 0;
    }
    assert_eq!(settings.validate(), Err(SettingsError::PostsPerPageOutOfRange(0)));

    if let Some(blog) = settings.blog.as_mut() {
        blog.posts_per_page = 100;
        blog.title = String::new();
    }
    assert_eq!(settings.save(&identity("admin")), Err(SettingsError::EmptyBlogTitle));
    assert_eq!(SettingsError::EmptyBlogTitle.error_code(), "E_SETTINGS_BLOG");
}

#[test]
fn stored_settings_deserialize_with_missing_sections() {
    let raw = r#"{"profile":{"name":"Ada","email":"ada@example.com"}}"#;
    let settings: Settings = serde_json::from_str(raw).unwrap();
    assert_eq!(settings.preferences, Preferences::default());
    assert!(settings.blog.is_none());
    assert!(settings.owner.is_empty());
}
