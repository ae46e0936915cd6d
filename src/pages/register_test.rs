use super::*;
use crate::net::provider::ProviderError;
use crate::state::auth::ValidationError;

#[test]
fn confirmation_must_match() {
    assert_eq!(check_confirmation("hunter22", "hunter22"), Ok(()));
    assert_eq!(check_confirmation("hunter22", "hunter23"), Err(PASSWORD_MISMATCH));
}

#[test]
fn outcome_for_created_and_pending_accounts() {
    let (kind, _) = registration_outcome(&Ok(Registration::ProfileCreated));
    assert_eq!(kind, NoticeKind::Success);
    let (kind, message) = registration_outcome(&Ok(Registration::AwaitingConfirmation));
    assert_eq!(kind, NoticeKind::Success);
    assert!(message.contains("confirm"));
}

#[test]
fn profile_inconsistency_is_reported_distinctly() {
    let err = AuthError::ProfileInconsistency { user_id: "u1".to_owned(), source: ProviderError::Unavailable };
    let (kind, message) = registration_outcome(&Err(err));
    assert_eq!(kind, NoticeKind::Error);
    assert!(message.starts_with("Your account was created"));
}

#[test]
fn validation_errors_are_shown_verbatim() {
    let err = AuthError::Validation(ValidationError::PasswordTooShort { min: MIN_PASSWORD_LEN });
    let (kind, message) = registration_outcome(&Err(err));
    assert_eq!(kind, NoticeKind::Error);
    assert_eq!(message, "password must be at least 8 characters long");
}

#[test]
fn provider_errors_are_prefixed() {
    let (_, message) = registration_outcome(&Err(AuthError::Provider(ProviderError::Unavailable)));
    assert_eq!(message, "Registration failed: identity provider unavailable");
}
