//! Reusable UI components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render dashboard chrome and forms while reading/writing shared
//! state from Leptos context providers (`RwSignal<Session>`,
//! `RwSignal<UiState>`, `SessionStore`).

pub mod loading_spinner;
pub mod notice_banner;
pub mod post_editor;
pub mod post_list;
pub mod route_gate;
pub mod settings_panel;
pub mod site_header;
pub mod stats_cards;
