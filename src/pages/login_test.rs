use super::*;
use crate::net::provider::ProviderError;
use crate::state::auth::ValidationError;

#[test]
fn oauth_return_url_lands_on_login() {
    assert_eq!(oauth_return_url("http://localhost:8080", None), "http://localhost:8080/login");
}

#[test]
fn oauth_return_url_carries_resume_target() {
    assert_eq!(
        oauth_return_url("https://cms.example.com", Some("/dashboard/settings")),
        "https://cms.example.com/login?next=%2Fdashboard%2Fsettings"
    );
}

#[test]
fn login_error_message_shows_validation_text_verbatim() {
    let err = AuthError::Validation(ValidationError::MissingFields);
    assert_eq!(login_error_message(&err), "all fields are required");
}

#[test]
fn login_error_message_prefixes_provider_errors() {
    let err = AuthError::Provider(ProviderError::Rejected {
        status: 400,
        message: "Invalid login credentials".to_owned(),
    });
    assert_eq!(login_error_message(&err), "Login failed: Invalid login credentials (status 400)");
}
