pub mod auth;
pub mod posts;
pub mod seed;
pub mod session_store;
pub mod settings;
pub mod ui;
