//! Breath cue: compression time accrued toward the next breaths.

use serde::Serialize;

/// How long breaths stay flagged after each advanced-airway interval.
pub const AIRWAY_GRACE_MS: u64 = 1_000;

/// Accrues compression time toward the next breath.
///
/// Without an airway the cue fills once and stays due until restarted.
/// With an advanced airway it wraps every interval and flags breaths for a
/// short grace window after each wrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreathCue {
    interval_ms: u64,
    accrued_ms: u64,
    repeating: bool,
    wraps: u32,
}

/// Breath cue state for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreathStatus {
    /// Fill fraction between 0.0 and 1.0.
    pub progress: f64,
    /// Compression time left until breaths are due.
    pub remaining_ms: u64,
    /// Breaths should be delivered now.
    pub breaths_due: bool,
}

impl BreathCue {
    /// A cue that fills once over `interval_ms`.
    #[must_use]
    pub fn single(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            accrued_ms: 0,
            repeating: false,
            wraps: 0,
        }
    }

    /// A cue that repeats every `interval_ms`.
    #[must_use]
    pub fn repeating(interval_ms: u64) -> Self {
        Self {
            repeating: true,
            ..Self::single(interval_ms)
        }
    }

    /// Start accruing from zero.
    pub fn restart(&mut self) {
        self.accrued_ms = 0;
        self.wraps = 0;
    }

    /// Add compression time. Returns `true` when breaths became due.
    pub fn advance(&mut self, delta_ms: u64) -> bool {
        let was_due = self.breaths_due();
        self.accrued_ms = self.accrued_ms.saturating_add(delta_ms);

        if self.repeating && self.accrued_ms >= self.interval_ms {
            let crossed = self.accrued_ms / self.interval_ms;
            self.wraps = self
                .wraps
                .saturating_add(u32::try_from(crossed).unwrap_or(u32::MAX));
            self.accrued_ms %= self.interval_ms;
            return true;
        }

        !was_due && self.breaths_due()
    }

    #[must_use]
    pub const fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Breaths should be delivered now.
    #[must_use]
    pub const fn breaths_due(&self) -> bool {
        if self.repeating {
            self.wraps > 0 && self.accrued_ms < AIRWAY_GRACE_MS
        } else {
            self.accrued_ms >= self.interval_ms
        }
    }

    /// Compression time left until breaths are due.
    #[must_use]
    pub const fn remaining_ms(&self) -> u64 {
        self.interval_ms.saturating_sub(self.accrued_ms)
    }

    /// Fill fraction between 0.0 and 1.0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        (self.accrued_ms as f64 / self.interval_ms as f64).min(1.0)
    }

    #[must_use]
    pub fn status(&self) -> BreathStatus {
        BreathStatus {
            progress: self.progress(),
            remaining_ms: self.remaining_ms(),
            breaths_due: self.breaths_due(),
        }
    }
}
