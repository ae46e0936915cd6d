//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates rendering details
//! to `components`. Pages assume `RouteGate` has already authorized them.

pub mod dashboard;
pub mod landing;
pub mod login;
pub mod register;
pub mod settings;
