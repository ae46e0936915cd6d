//! Networking modules for the hosted identity backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `provider` defines the backend-neutral trait the session store talks to,
//! and `supabase` implements it over HTTP.

pub mod provider;
pub mod supabase;
