//! Training cues derived from the session timer.
//!
//! The tracker only observes the timer; call [`CueTracker::update`] after
//! every `tick` and it reports which cues just fired.

pub mod breath;
pub mod cycle;
pub mod profile;
pub mod timeline;
pub mod warning;

use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::core::{Mode, SessionTimer};

pub use breath::{BreathCue, BreathStatus};
pub use cycle::{CycleCue, CycleStatus};
pub use profile::{CprProfile, PatientType};
pub use timeline::{Segment, SegmentKind};
pub use warning::PauseWarning;

/// A cue that started on the latest update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CueAlert {
    /// Breaths are due.
    BreathsDue,
    /// A cycle completed; check the pulse.
    PulseCheckDue,
    /// The open pause passed the warning threshold.
    LongPause,
}

impl CueAlert {
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::BreathsDue => "Give breaths",
            Self::PulseCheckDue => "Pulse check due",
            Self::LongPause => "Long pause: resume compressions",
        }
    }
}

/// All cue state for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CueStatus {
    /// `None` when breath cues are disabled.
    pub breath: Option<BreathStatus>,
    /// `None` when pulse cues are disabled.
    pub cycle: Option<CycleStatus>,
    pub long_pause: bool,
    pub profile: CprProfile,
}

/// Breath, cycle and long pause cues for one session.
#[derive(Debug, Clone)]
pub struct CueTracker {
    profile: CprProfile,
    breath: BreathCue,
    cycle: CycleCue,
    warning: PauseWarning,
    breath_enabled: bool,
    pulse_enabled: bool,
    last_mode: Mode,
    last_pause_count: u32,
    pulse_alerted: u64,
}

impl CueTracker {
    /// Build a tracker from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let profile = config.cues.profile();
        Self {
            breath: breath_cue_for(&profile),
            profile,
            cycle: CycleCue::new(config.timer.cycle_seconds.saturating_mul(1000)),
            warning: PauseWarning::new(
                config.timer.long_pause_warning_seconds.saturating_mul(1000),
                config.timer.long_pause_warning,
            ),
            breath_enabled: config.cues.breath_cues,
            pulse_enabled: config.cues.pulse_cues,
            last_mode: Mode::Idle,
            last_pause_count: 0,
            pulse_alerted: 0,
        }
    }

    #[must_use]
    pub const fn profile(&self) -> &CprProfile {
        &self.profile
    }

    /// Replace the CPR profile. Restarts the breath cue.
    pub fn set_profile(&mut self, profile: CprProfile) {
        self.profile = profile;
        self.breath = breath_cue_for(&self.profile);
    }

    /// Toggle the advanced airway. Restarts the breath cue.
    pub fn toggle_advanced_airway(&mut self) -> bool {
        let mut profile = self.profile;
        profile.set_advanced_airway(!profile.advanced_airway());
        self.set_profile(profile);
        debug!(airway = profile.advanced_airway(), "advanced airway toggled");
        profile.advanced_airway()
    }

    /// Acknowledge the pulse check for all cycles so far.
    pub fn acknowledge_pulse(&mut self, timer: &SessionTimer) {
        self.cycle.acknowledge(timer.elapsed_ms());
        self.pulse_alerted = self.cycle.completed_cycles(timer.elapsed_ms());
    }

    /// Observe the timer after a `tick(delta_ms)`.
    ///
    /// Returns the cues that started on this update.
    pub fn update(&mut self, timer: &SessionTimer, delta_ms: u64) -> Vec<CueAlert> {
        let mut alerts = Vec::new();
        let mode = timer.mode();

        if mode == Mode::Idle {
            self.reset();
            return alerts;
        }

        if mode == Mode::Compressing {
            let entered = self.last_mode != Mode::Compressing
                || self.last_pause_count != timer.pause_count();
            if entered {
                self.breath.restart();
            }
            if self.breath.advance(delta_ms) && self.breath_enabled {
                alerts.push(CueAlert::BreathsDue);
            }
        }

        if self.pulse_enabled && mode.is_running() {
            let completed = self.cycle.completed_cycles(timer.elapsed_ms());
            if self.cycle.pulse_check_due(timer.elapsed_ms()) && completed > self.pulse_alerted {
                self.pulse_alerted = completed;
                alerts.push(CueAlert::PulseCheckDue);
            }
        }

        if self.warning.check(timer) {
            alerts.push(CueAlert::LongPause);
        }

        self.last_mode = mode;
        self.last_pause_count = timer.pause_count();
        for alert in &alerts {
            debug!(?alert, elapsed_ms = timer.elapsed_ms(), "cue fired");
        }
        alerts
    }

    /// Forget all per-session cue state.
    pub fn reset(&mut self) {
        self.breath.restart();
        self.cycle.reset();
        self.warning.reset();
        self.last_mode = Mode::Idle;
        self.last_pause_count = 0;
        self.pulse_alerted = 0;
    }

    #[must_use]
    pub fn status(&self, timer: &SessionTimer) -> CueStatus {
        CueStatus {
            breath: self.breath_enabled.then(|| self.breath.status()),
            cycle: self
                .pulse_enabled
                .then(|| self.cycle.status(timer.elapsed_ms())),
            long_pause: self.warning.is_active(timer),
            profile: self.profile,
        }
    }
}

fn breath_cue_for(profile: &CprProfile) -> BreathCue {
    if profile.advanced_airway() {
        BreathCue::repeating(profile.breath_interval_ms())
    } else {
        BreathCue::single(profile.breath_interval_ms())
    }
}
