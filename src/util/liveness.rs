//! Mount-scoped liveness flag for async work started by a view.
//!
//! A page that spawns provider calls keeps a `Liveness`, retires it in
//! `on_cleanup`, and checks `is_alive` before writing the late result into
//! its signals.

#[cfg(test)]
#[path = "liveness_test.rs"]
mod liveness_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Clone, Debug)]
pub struct Liveness {
    alive: Arc<AtomicBool>,
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl Liveness {
    #[must_use]
    pub fn new() -> Self {
        Self { alive: Arc::new(AtomicBool::new(true)) }
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    /// Mark the owning view as gone. Idempotent.
    pub fn retire(&self) {
        self.alive.store(false, Ordering::Relaxed);
    }

    /// Run `apply` only while the owning view is still mounted.
    pub fn run_if_alive(&self, apply: impl FnOnce()) -> bool {
        if self.is_alive() {
            apply();
            true
        } else {
            false
        }
    }
}
