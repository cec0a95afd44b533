//! Long pause warning.

use crate::core::{Mode, SessionTimer};

/// Fires once per pause when it reaches the threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PauseWarning {
    threshold_ms: u64,
    enabled: bool,
    // Pause number (1-based pause_count) already warned about
    warned_for: Option<u32>,
}

impl PauseWarning {
    #[must_use]
    pub const fn new(threshold_ms: u64, enabled: bool) -> Self {
        Self {
            threshold_ms,
            enabled,
            warned_for: None,
        }
    }

    /// Returns `true` the first time the open pause reaches the threshold.
    pub fn check(&mut self, timer: &SessionTimer) -> bool {
        if timer.mode() != Mode::Paused {
            self.warned_for = None;
            return false;
        }
        if !self.enabled || self.warned_for == Some(timer.pause_count()) {
            return false;
        }

        let over = timer
            .current_pause_ms()
            .is_some_and(|ms| ms >= self.threshold_ms);
        if over {
            self.warned_for = Some(timer.pause_count());
        }
        over
    }

    /// The open pause has already triggered the warning.
    #[must_use]
    pub fn is_active(&self, timer: &SessionTimer) -> bool {
        timer.mode() == Mode::Paused && self.warned_for == Some(timer.pause_count())
    }

    pub fn reset(&mut self) {
        self.warned_for = None;
    }
}
