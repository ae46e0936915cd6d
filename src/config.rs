//! Identity-provider configuration.
//!
//! DESIGN
//! ======
//! The browser build has no process environment, so values are baked in at
//! compile time through `option_env!`. `from_values` takes the same inputs
//! explicitly so parsing rules can be exercised natively.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_LOG_LEVEL: log::Level = log::Level::Info;

const URL_VAR: &str = "BLOGCMS_SUPABASE_URL";
const ANON_KEY_VAR: &str = "BLOGCMS_SUPABASE_ANON_KEY";

/// Errors produced while building [`ProviderConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required value was not provided at build time.
    #[error("missing config value: {var} not set")]
    Missing { var: &'static str },

    /// The provider URL is not an absolute http(s) URL.
    #[error("invalid provider url: {0}")]
    InvalidUrl(String),

    /// The log level is not one of `error`, `warn`, `info`, `debug`, `trace`.
    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),
}

/// Connection settings for the hosted identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Project base URL without a trailing slash.
    pub url: String,
    /// Public (anon) API key sent as the `apikey` header.
    pub anon_key: String,
    pub log_level: log::Level,
}

impl ProviderConfig {
    /// Build config from compile-time environment variables.
    ///
    /// Required:
    /// - `BLOGCMS_SUPABASE_URL`
    /// - `BLOGCMS_SUPABASE_ANON_KEY`
    ///
    /// Optional:
    /// - `BLOGCMS_LOG_LEVEL`: default `info`
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required value is missing or malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            option_env!("BLOGCMS_SUPABASE_URL"),
            option_env!("BLOGCMS_SUPABASE_ANON_KEY"),
            option_env!("BLOGCMS_LOG_LEVEL"),
        )
    }

    /// Build config from explicit values.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required value is missing or malformed.
    pub fn from_values(url: Option<&str>, anon_key: Option<&str>, log_level: Option<&str>) -> Result<Self, ConfigError> {
        let url = non_empty(url).ok_or(ConfigError::Missing { var: URL_VAR })?;
        let url = parse_url(url)?;
        let anon_key = non_empty(anon_key)
            .ok_or(ConfigError::Missing { var: ANON_KEY_VAR })?
            .to_owned();
        let log_level = parse_log_level(log_level)?;
        Ok(Self { url, anon_key, log_level })
    }

    /// Log level to use before (or without) a full config.
    #[must_use]
    pub fn log_level_from_env() -> log::Level {
        parse_log_level(option_env!("BLOGCMS_LOG_LEVEL")).unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim_end_matches('/');
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .ok_or_else(|| ConfigError::InvalidUrl(raw.to_owned()))?;
    if rest.is_empty() || rest.contains(char::is_whitespace) {
        return Err(ConfigError::InvalidUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

fn parse_log_level(raw: Option<&str>) -> Result<log::Level, ConfigError> {
    match non_empty(raw) {
        None => Ok(DEFAULT_LOG_LEVEL),
        Some(v) => v
            .parse::<log::Level>()
            .map_err(|_| ConfigError::InvalidLogLevel(v.to_owned())),
    }
}
