use super::*;

// =============================================================
// Role
// =============================================================

#[test]
fn role_parse_known_values() {
    assert_eq!(Role::parse(Some("admin")), Role::Admin);
    assert_eq!(Role::parse(Some("editor")), Role::Editor);
}

#[test]
fn role_parse_unknown_is_least_privilege() {
    assert_eq!(Role::parse(Some("superuser")), Role::Editor);
    assert_eq!(Role::parse(Some("")), Role::Editor);
    assert_eq!(Role::parse(None), Role::Editor);
    for near_admin in ["ADMIN", " Admin ", "aDmIn", "admin "] {
        assert_eq!(Role::parse(Some(near_admin)), Role::Editor, "{near_admin:?}");
    }
}

#[test]
fn role_home_and_settings_paths() {
    assert_eq!(Role::Admin.home_path(), "/dashboard");
    assert_eq!(Role::Editor.home_path(), "/editor");
    assert_eq!(Role::Admin.settings_path(), "/dashboard/settings");
    assert_eq!(Role::Editor.settings_path(), "/editor/settings");
}

#[test]
fn role_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    let role: Role = serde_json::from_str("\"editor\"").unwrap();
    assert_eq!(role, Role::Editor);
}

// =============================================================
// Identity
// =============================================================

#[test]
fn identity_uses_profile_name() {
    let identity = Identity::from_parts("u1", Some("ada@example.com"), Some("Ada"), Some("admin"));
    assert_eq!(identity.display_name, "Ada");
    assert_eq!(identity.email, "ada@example.com");
    assert_eq!(identity.role, Role::Admin);
}

#[test]
fn identity_name_falls_back_to_email_local_part() {
    let identity = Identity::from_parts("u1", Some("grace@example.com"), Some("  "), None);
    assert_eq!(identity.display_name, "grace");
    assert_eq!(identity.role, Role::Editor);
}

#[test]
fn identity_name_falls_back_to_user() {
    let identity = Identity::from_parts("u1", None, None, Some("editor"));
    assert_eq!(identity.display_name, "User");
    assert_eq!(identity.email, "");
}

// =============================================================
// Session
// =============================================================

#[test]
fn session_default_is_restoring() {
    let session = Session::default();
    assert!(session.loading);
    assert!(session.identity.is_none());
}

#[test]
fn session_loading_hides_identity() {
    let mut session = Session::signed_in(Identity::from_parts("u1", Some("a@b.com"), Some("A"), Some("admin")));
    assert!(session.is_authenticated());
    session.loading = true;
    assert!(session.resolved_identity().is_none());
    assert!(!session.is_authenticated());
}

// =============================================================
// Validation
// =============================================================

#[test]
fn registration_requires_all_fields() {
    assert_eq!(
        validate_registration("", "a@b.com", "longpassword"),
        Err(ValidationError::MissingFields)
    );
    assert_eq!(
        validate_registration("A", "  ", "longpassword"),
        Err(ValidationError::MissingFields)
    );
    assert_eq!(validate_registration("A", "a@b.com", ""), Err(ValidationError::MissingFields));
}

#[test]
fn registration_rejects_short_password() {
    assert_eq!(
        validate_registration("A", "a@b.com", "short"),
        Err(ValidationError::PasswordTooShort { min: 8 })
    );
}

#[test]
fn registration_counts_characters_not_bytes() {
    assert_eq!(
        validate_registration("A", "a@b.com", "ééééééé"),
        Err(ValidationError::PasswordTooShort { min: 8 })
    );
    assert!(validate_registration("A", "a@b.com", "éééééééé").is_ok());
}

#[test]
fn registration_trims_name_and_email() {
    assert_eq!(
        validate_registration("  Ada ", " ada@example.com ", "longpassword"),
        Ok(("Ada".to_owned(), "ada@example.com".to_owned()))
    );
}

#[test]
fn normalize_email_rejects_bad_shapes() {
    assert_eq!(normalize_email("user"), Err(ValidationError::InvalidEmail));
    assert_eq!(normalize_email("@example.com"), Err(ValidationError::InvalidEmail));
    assert_eq!(normalize_email("user@"), Err(ValidationError::InvalidEmail));
    assert_eq!(normalize_email("a@b@c"), Err(ValidationError::InvalidEmail));
}

#[test]
fn auth_error_codes_are_distinct() {
    let validation = AuthError::from(ValidationError::MissingFields);
    let provider = AuthError::from(ProviderError::NotSignedIn);
    let inconsistent =
        AuthError::ProfileInconsistency { user_id: "u1".to_owned(), source: ProviderError::Network("down".to_owned()) };
    let restore = AuthError::SessionRestore(ProviderError::Unavailable);
    assert_eq!(validation.error_code(), "E_VALIDATION");
    assert_eq!(provider.error_code(), "E_PROVIDER");
    assert_eq!(inconsistent.error_code(), "E_PROFILE_INCONSISTENT");
    assert_eq!(restore.error_code(), "E_SESSION_RESTORE");
    assert!(inconsistent.to_string().contains("u1"));
}
