//! Two-minute cycle and pulse check cue.

use serde::Serialize;

/// Tracks CPR cycles over session elapsed time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleCue {
    cycle_ms: u64,
    acknowledged: u64,
}

/// Cycle state for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleStatus {
    /// Time into the current cycle.
    pub cycle_elapsed_ms: u64,
    /// Length of one cycle.
    pub cycle_ms: u64,
    /// Full cycles since the session started.
    pub completed_cycles: u64,
    /// A cycle boundary passed since the last acknowledgement.
    pub pulse_check_due: bool,
}

impl CycleCue {
    #[must_use]
    pub fn new(cycle_ms: u64) -> Self {
        Self {
            cycle_ms: cycle_ms.max(1),
            acknowledged: 0,
        }
    }

    /// Full cycles completed after `elapsed_ms` of session time.
    #[must_use]
    pub const fn completed_cycles(&self, elapsed_ms: u64) -> u64 {
        elapsed_ms / self.cycle_ms
    }

    /// Time into the current cycle.
    #[must_use]
    pub const fn cycle_elapsed_ms(&self, elapsed_ms: u64) -> u64 {
        elapsed_ms % self.cycle_ms
    }

    #[must_use]
    pub const fn pulse_check_due(&self, elapsed_ms: u64) -> bool {
        self.completed_cycles(elapsed_ms) > self.acknowledged
    }

    /// Mark every cycle completed so far as checked.
    pub fn acknowledge(&mut self, elapsed_ms: u64) {
        self.acknowledged = self.completed_cycles(elapsed_ms);
    }

    pub fn reset(&mut self) {
        self.acknowledged = 0;
    }

    #[must_use]
    pub const fn status(&self, elapsed_ms: u64) -> CycleStatus {
        CycleStatus {
            cycle_elapsed_ms: self.cycle_elapsed_ms(elapsed_ms),
            cycle_ms: self.cycle_ms,
            completed_cycles: self.completed_cycles(elapsed_ms),
            pulse_check_due: self.pulse_check_due(elapsed_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps() {
        let cue = CycleCue::new(120_000);
        assert_eq!(cue.cycle_elapsed_ms(130_000), 10_000);
        assert_eq!(cue.completed_cycles(130_000), 1);
        assert_eq!(cue.completed_cycles(119_999), 0);
    }

    #[test]
    fn test_pulse_check_acknowledge() {
        let mut cue = CycleCue::new(120_000);
        assert!(!cue.pulse_check_due(60_000));
        assert!(cue.pulse_check_due(120_000));

        cue.acknowledge(125_000);
        assert!(!cue.pulse_check_due(200_000));
        assert!(cue.pulse_check_due(240_000));

        cue.reset();
        assert!(cue.pulse_check_due(125_000));
    }

    #[test]
    fn test_status() {
        let cue = CycleCue::new(1_000);
        let status = cue.status(2_500);
        assert_eq!(status.cycle_elapsed_ms, 500);
        assert_eq!(status.completed_cycles, 2);
        assert!(status.pulse_check_due);
    }
}
