//! # blogcms
//!
//! Leptos + WASM front end for the BlogCMS content-management admin.
//!
//! This crate contains the role-gated router, the session store that fronts
//! the hosted identity provider, the in-memory post catalog used by the admin
//! and editor dashboards, and the pages and components that render them.
//! Everything outside `csr`-gated browser glue builds and tests natively.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point: install panic/log hooks and mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let level = config::ProviderConfig::log_level_from_env();
    let _ = console_log::init_with_level(level);
    leptos::mount::mount_to_body(app::App);
}
