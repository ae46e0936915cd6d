//! Theme initialization and toggle.
//!
//! Reads the stored theme from `localStorage` (dark when nothing is stored)
//! and applies a `data-theme` attribute to the `<html>` element. Toggle writes
//! back to `localStorage` and updates that attribute.
//!
//! TRADE-OFFS
//! ==========
//! Persistence is best-effort browser-only behavior; native builds no-op so
//! tests stay deterministic.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use serde::{Deserialize, Serialize};

pub const STORAGE_KEY: &str = "blogcms.theme";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Theme choice offered in settings; `System` follows the OS.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    System,
    Light,
    Dark,
}

impl ThemePreference {
    #[must_use]
    pub fn resolve(self, system_prefers_dark: bool) -> Theme {
        match self {
            Self::System if system_prefers_dark => Theme::Dark,
            Self::System | Self::Light => Theme::Light,
            Self::Dark => Theme::Dark,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "light" => Self::Light,
            "dark" => Self::Dark,
            _ => Self::System,
        }
    }
}

/// Read the stored theme, defaulting to dark.
pub fn read_preference() -> Theme {
    crate::util::storage::load_raw(STORAGE_KEY)
        .and_then(|raw| Theme::parse(&raw))
        .unwrap_or_default()
}

/// Whether the OS reports a dark color scheme.
pub fn system_prefers_dark() -> bool {
    #[cfg(feature = "csr")]
    {
        web_sys::window()
            .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
            .map_or(false, |mq| mq.matches())
    }
    #[cfg(not(feature = "csr"))]
    {
        false
    }
}

/// Apply the `data-theme` attribute on the `<html>` element.
pub fn apply(theme: Theme) {
    #[cfg(feature = "csr")]
    {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|doc| doc.document_element())
        {
            let _ = el.set_attribute("data-theme", theme.as_str());
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = theme;
    }
}

/// Apply and persist `theme`.
pub fn set(theme: Theme) {
    apply(theme);
    crate::util::storage::save_raw(STORAGE_KEY, theme.as_str());
}

/// Flip the theme, persist it, and return the new value.
pub fn toggle(current: Theme) -> Theme {
    let next = current.toggled();
    set(next);
    next
}
