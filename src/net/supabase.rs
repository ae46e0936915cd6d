//! Supabase-backed `IdentityProvider` (GoTrue auth + PostgREST profiles).
//!
//! Browser (csr): real HTTP calls via `gloo-net`, tokens kept in memory and
//! mirrored to `localStorage`. Native builds: every network call returns
//! `ProviderError::Unavailable`, matching the no-op stubs used for browser
//! glue elsewhere in the crate.
//!
//! ERROR HANDLING
//! ==============
//! Non-success responses become `ProviderError::Rejected` with the most
//! specific message the body offers. An expired or revoked stored session is
//! treated as "no session", not as an error.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "supabase_test.rs"]
mod supabase_test;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::provider::{
    AuthChange, AuthListener, AuthUser, IdentityProvider, NewProfile, OAuthProvider, ProfileRow, ProviderError,
};
use crate::config::ProviderConfig;

#[cfg(feature = "csr")]
const TOKEN_STORAGE_KEY: &str = "blogcms.auth";

/// Seconds of slack before `expires_at` at which a token counts as expired.
#[cfg(any(test, feature = "csr"))]
const EXPIRY_MARGIN_SECS: f64 = 30.0;

/// Access/refresh token pair for the active session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Expiry in seconds since the Unix epoch, when known.
    pub expires_at: Option<f64>,
}

impl StoredTokens {
    #[cfg(any(test, feature = "csr"))]
    fn is_expired(&self, now_secs: f64) -> bool {
        self.expires_at
            .is_some_and(|at| at - EXPIRY_MARGIN_SECS <= now_secs)
    }
}

/// Identity provider talking to a Supabase project.
pub struct SupabaseProvider {
    config: ProviderConfig,
    tokens: Mutex<Option<StoredTokens>>,
    listeners: Mutex<Vec<AuthListener>>,
}

impl SupabaseProvider {
    #[must_use]
    pub fn new(config: ProviderConfig) -> Self {
        Self { config, tokens: Mutex::new(None), listeners: Mutex::new(Vec::new()) }
    }

    #[cfg_attr(not(feature = "csr"), allow(dead_code))]
    fn notify(&self, change: &AuthChange) {
        let listeners = self.listeners.lock().clone();
        for listener in listeners {
            listener(change.clone());
        }
    }

    #[cfg_attr(not(feature = "csr"), allow(dead_code))]
    fn set_tokens(&self, tokens: Option<StoredTokens>) {
        #[cfg(feature = "csr")]
        {
            match &tokens {
                Some(t) => crate::util::storage::save_json(TOKEN_STORAGE_KEY, t),
                None => crate::util::storage::remove(TOKEN_STORAGE_KEY),
            }
        }
        *self.tokens.lock() = tokens;
    }
}

// =============================================================================
// ENDPOINTS + PARSING
// =============================================================================

#[cfg(any(test, feature = "csr"))]
fn password_grant_url(base: &str) -> String {
    format!("{base}/auth/v1/token?grant_type=password")
}

#[cfg(any(test, feature = "csr"))]
fn refresh_grant_url(base: &str) -> String {
    format!("{base}/auth/v1/token?grant_type=refresh_token")
}

#[cfg(any(test, feature = "csr"))]
fn signup_url(base: &str) -> String {
    format!("{base}/auth/v1/signup")
}

#[cfg(any(test, feature = "csr"))]
fn user_url(base: &str) -> String {
    format!("{base}/auth/v1/user")
}

#[cfg(any(test, feature = "csr"))]
fn logout_url(base: &str) -> String {
    format!("{base}/auth/v1/logout")
}

#[cfg(any(test, feature = "csr"))]
fn profiles_url(base: &str) -> String {
    format!("{base}/rest/v1/profiles")
}

#[cfg(any(test, feature = "csr"))]
fn profile_query_url(base: &str, user_id: &str) -> String {
    format!("{base}/rest/v1/profiles?id=eq.{}&select=*", urlencoding::encode(user_id))
}

fn authorize_url(base: &str, provider: OAuthProvider, redirect_to: &str) -> String {
    format!(
        "{base}/auth/v1/authorize?provider={}&redirect_to={}",
        provider.as_str(),
        urlencoding::encode(redirect_to)
    )
}

/// Map a non-success response to `Rejected`, preferring the body's message.
#[cfg(any(test, feature = "csr"))]
fn rejection(status: u16, body: &str) -> ProviderError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["error_description", "msg", "message", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(|m| m.as_str()).map(str::to_owned))
        })
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("request failed with status {status}"));
    ProviderError::Rejected { status, message }
}

#[cfg(any(test, feature = "csr"))]
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<f64>,
    #[serde(default)]
    expires_at: Option<f64>,
    user: AuthUser,
}

#[cfg(any(test, feature = "csr"))]
impl TokenResponse {
    fn into_parts(self, now_secs: f64) -> (StoredTokens, AuthUser) {
        let expires_at = self
            .expires_at
            .or_else(|| self.expires_in.map(|secs| now_secs + secs));
        let tokens =
            StoredTokens { access_token: self.access_token, refresh_token: self.refresh_token, expires_at };
        (tokens, self.user)
    }
}

#[cfg(any(test, feature = "csr"))]
fn parse_token_response(body: &str, now_secs: f64) -> Result<(StoredTokens, AuthUser), ProviderError> {
    let parsed: TokenResponse = serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;
    Ok(parsed.into_parts(now_secs))
}

/// Sign-up answers with a session when auto-confirm is on, or with the bare
/// user record when email confirmation is pending.
#[cfg(any(test, feature = "csr"))]
fn parse_signup_response(body: &str, now_secs: f64) -> Result<(Option<StoredTokens>, Option<AuthUser>), ProviderError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;
    if value.get("access_token").is_some() {
        let parsed: TokenResponse =
            serde_json::from_value(value).map_err(|e| ProviderError::Parse(e.to_string()))?;
        let (tokens, user) = parsed.into_parts(now_secs);
        return Ok((Some(tokens), Some(user)));
    }
    let user_value = value.get("user").cloned().unwrap_or(value);
    if user_value.get("id").is_none() {
        return Ok((None, None));
    }
    let user: AuthUser = serde_json::from_value(user_value).map_err(|e| ProviderError::Parse(e.to_string()))?;
    Ok((None, Some(user)))
}

/// Read tokens handed back in the URL fragment after an OAuth redirect.
#[cfg(any(test, feature = "csr"))]
fn parse_fragment_tokens(fragment: &str, now_secs: f64) -> Option<StoredTokens> {
    let mut access_token = None;
    let mut refresh_token = None;
    let mut expires_at = None;
    let mut expires_in = None;
    for pair in fragment.trim_start_matches('#').split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let value = urlencoding::decode(value).ok()?.into_owned();
        match key {
            "access_token" => access_token = Some(value),
            "refresh_token" => refresh_token = Some(value),
            "expires_at" => expires_at = value.parse::<f64>().ok(),
            "expires_in" => expires_in = value.parse::<f64>().ok(),
            _ => {}
        }
    }
    let access_token = access_token.filter(|t| !t.is_empty())?;
    let expires_at = expires_at.or_else(|| expires_in.map(|secs| now_secs + secs));
    Some(StoredTokens { access_token, refresh_token, expires_at })
}

#[cfg(any(test, feature = "csr"))]
fn profile_insert_body(profile: &NewProfile, created_at: &str) -> serde_json::Value {
    serde_json::json!([{
        "id": profile.id,
        "name": profile.name,
        "email": profile.email,
        "role": profile.role.as_str(),
        "created_at": created_at,
    }])
}

#[cfg(any(test, feature = "csr"))]
fn first_profile(body: &str, user_id: &str) -> Result<ProfileRow, ProviderError> {
    let rows: Vec<ProfileRow> = serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;
    rows.into_iter()
        .next()
        .ok_or_else(|| ProviderError::MissingProfile { user_id: user_id.to_owned() })
}

// =============================================================================
// BROWSER TRANSPORT
// =============================================================================

#[cfg(feature = "csr")]
mod transport {
    use gloo_net::http::{Request, RequestBuilder};

    use super::{ProviderError, rejection};

    pub(super) fn now_secs() -> f64 {
        js_sys::Date::now() / 1000.0
    }

    pub(super) fn with_auth(builder: RequestBuilder, anon_key: &str, bearer: Option<&str>) -> RequestBuilder {
        builder
            .header("apikey", anon_key)
            .header("Authorization", &format!("Bearer {}", bearer.unwrap_or(anon_key)))
    }

    /// Send a request and return the body of a successful response.
    pub(super) async fn execute(request: Result<Request, gloo_net::Error>) -> Result<String, ProviderError> {
        let request = request.map_err(|e| ProviderError::Network(e.to_string()))?;
        let resp = request
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;
        if !resp.ok() {
            return Err(rejection(status, &body));
        }
        Ok(body)
    }

    /// Take OAuth tokens out of `location.hash` and scrub them from the URL.
    pub(super) fn take_fragment() -> Option<String> {
        let window = web_sys::window()?;
        let hash = window.location().hash().ok()?;
        if !hash.contains("access_token=") {
            return None;
        }
        let pathname = window.location().pathname().ok()?;
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&pathname));
        }
        Some(hash)
    }
}

#[cfg(feature = "csr")]
impl SupabaseProvider {
    fn load_tokens(&self) -> Option<StoredTokens> {
        let cached = self.tokens.lock().clone();
        cached.or_else(|| {
            let stored = crate::util::storage::load_json::<StoredTokens>(TOKEN_STORAGE_KEY);
            *self.tokens.lock() = stored.clone();
            stored
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Option<StoredTokens>, ProviderError> {
        let body = serde_json::json!({ "refresh_token": refresh_token });
        let request = transport::with_auth(
            gloo_net::http::Request::post(&refresh_grant_url(&self.config.url)),
            &self.config.anon_key,
            None,
        )
        .json(&body);
        match transport::execute(request).await {
            Ok(body) => {
                let (tokens, _) = parse_token_response(&body, transport::now_secs())?;
                Ok(Some(tokens))
            }
            Err(ProviderError::Rejected { status, message }) => {
                log::info!("stored session could not be refreshed ({status}): {message}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn bearer(&self) -> Option<String> {
        self.tokens.lock().as_ref().map(|t| t.access_token.clone())
    }
}

#[async_trait::async_trait(?Send)]
impl IdentityProvider for SupabaseProvider {
    async fn current_session(&self) -> Result<Option<AuthUser>, ProviderError> {
        #[cfg(feature = "csr")]
        {
            if let Some(tokens) = transport::take_fragment()
                .and_then(|fragment| parse_fragment_tokens(&fragment, transport::now_secs()))
            {
                self.set_tokens(Some(tokens));
            }
            let Some(mut tokens) = self.load_tokens() else {
                return Ok(None);
            };
            if tokens.is_expired(transport::now_secs()) {
                let refreshed = match tokens.refresh_token.as_deref() {
                    Some(refresh_token) => self.refresh(refresh_token).await?,
                    None => None,
                };
                let Some(refreshed) = refreshed else {
                    self.set_tokens(None);
                    return Ok(None);
                };
                self.set_tokens(Some(refreshed.clone()));
                tokens = refreshed;
            }
            let request = transport::with_auth(
                gloo_net::http::Request::get(&user_url(&self.config.url)),
                &self.config.anon_key,
                Some(&tokens.access_token),
            )
            .build();
            match transport::execute(request).await {
                Ok(body) => {
                    let user: AuthUser = serde_json::from_str(&body).map_err(|e| ProviderError::Parse(e.to_string()))?;
                    Ok(Some(user))
                }
                Err(ProviderError::Rejected { status: 401 | 403, .. }) => {
                    self.set_tokens(None);
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(ProviderError::Unavailable)
        }
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthUser, ProviderError> {
        #[cfg(feature = "csr")]
        {
            let body = serde_json::json!({ "email": email, "password": password });
            let request = transport::with_auth(
                gloo_net::http::Request::post(&password_grant_url(&self.config.url)),
                &self.config.anon_key,
                None,
            )
            .json(&body);
            let body = transport::execute(request).await?;
            let (tokens, user) = parse_token_response(&body, transport::now_secs())?;
            self.set_tokens(Some(tokens));
            self.notify(&AuthChange::SignedIn(user.clone()));
            Ok(user)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (email, password);
            Err(ProviderError::Unavailable)
        }
    }

    async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<Option<AuthUser>, ProviderError> {
        #[cfg(feature = "csr")]
        {
            let body = serde_json::json!({ "email": email, "password": password, "data": { "name": name } });
            let request = transport::with_auth(
                gloo_net::http::Request::post(&signup_url(&self.config.url)),
                &self.config.anon_key,
                None,
            )
            .json(&body);
            let body = transport::execute(request).await?;
            let (tokens, user) = parse_signup_response(&body, transport::now_secs())?;
            if let (Some(tokens), Some(user)) = (tokens, user.as_ref()) {
                self.set_tokens(Some(tokens));
                self.notify(&AuthChange::SignedIn(user.clone()));
            }
            Ok(user)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (email, password, name);
            Err(ProviderError::Unavailable)
        }
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        #[cfg(feature = "csr")]
        {
            if let Some(token) = self.bearer() {
                let request = transport::with_auth(
                    gloo_net::http::Request::post(&logout_url(&self.config.url)),
                    &self.config.anon_key,
                    Some(&token),
                )
                .build();
                match transport::execute(request).await {
                    Ok(_) | Err(ProviderError::Rejected { status: 401 | 403, .. }) => {}
                    Err(e) => return Err(e),
                }
            }
            self.set_tokens(None);
            self.notify(&AuthChange::SignedOut);
            Ok(())
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(ProviderError::Unavailable)
        }
    }

    fn oauth_authorize_url(&self, provider: OAuthProvider, redirect_to: &str) -> Result<String, ProviderError> {
        Ok(authorize_url(&self.config.url, provider, redirect_to))
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<ProfileRow, ProviderError> {
        #[cfg(feature = "csr")]
        {
            let token = self.bearer();
            let request = transport::with_auth(
                gloo_net::http::Request::get(&profile_query_url(&self.config.url, user_id)),
                &self.config.anon_key,
                token.as_deref(),
            )
            .build();
            let body = transport::execute(request).await?;
            first_profile(&body, user_id)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = user_id;
            Err(ProviderError::Unavailable)
        }
    }

    async fn insert_profile(&self, profile: &NewProfile) -> Result<(), ProviderError> {
        #[cfg(feature = "csr")]
        {
            let token = self.bearer();
            let body = profile_insert_body(profile, &crate::util::time::now_iso());
            let request = transport::with_auth(
                gloo_net::http::Request::post(&profiles_url(&self.config.url)),
                &self.config.anon_key,
                token.as_deref(),
            )
            .header("Prefer", "return=minimal")
            .json(&body);
            transport::execute(request).await?;
            Ok(())
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = profile;
            Err(ProviderError::Unavailable)
        }
    }

    fn on_auth_change(&self, listener: AuthListener) {
        self.listeners.lock().push(listener);
    }
}
