//! Local UI chrome state (theme and the transient notice banner).
//!
//! DESIGN
//! ======
//! Keeps presentation concerns out of session and catalog state. Provided as
//! an `RwSignal<UiState>` through context by `App`.

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

use crate::util::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// One-line feedback shown after an action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    /// Increments per notice so identical messages still re-render.
    pub seq: u64,
}

#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub theme: Theme,
    pub notice: Option<Notice>,
    notice_seq: u64,
}

impl UiState {
    #[must_use]
    pub fn with_theme(theme: Theme) -> Self {
        Self { theme, ..Self::default() }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NoticeKind::Success, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeKind::Error, message.into());
    }

    pub fn dismiss(&mut self) {
        self.notice = None;
    }

    fn push(&mut self, kind: NoticeKind, message: String) {
        self.notice_seq += 1;
        self.notice = Some(Notice { kind, message, seq: self.notice_seq });
    }
}
