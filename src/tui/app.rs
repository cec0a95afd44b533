//! Application state for the TUI.

use tracing::{error, info, warn};

use crate::config::Config;
use crate::core::{InvalidTransition, Mode, PauseReason, SessionSink, SessionTimer};
use crate::features::cues::{CueAlert, CueTracker};
use crate::tui::event::Action;

/// Application state.
pub struct App<S: SessionSink> {
    /// The session being run.
    pub timer: SessionTimer,
    /// Breath, pulse and long pause cues.
    pub cues: CueTracker,
    /// Reasons offered by the number keys.
    pub reasons: Vec<PauseReason>,
    /// Status message to display.
    pub status: Option<String>,
    /// Most recent cue that fired.
    pub alert: Option<CueAlert>,
    /// Whether the help panel is shown.
    pub show_help: bool,
    /// Show the reason picker while paused.
    pub reason_prompt: bool,
    /// CCF shown as on target.
    pub target_ccf: u8,
    /// Id of the saved record for the ended session.
    pub saved_id: Option<i64>,
    sink: S,
}

impl<S: SessionSink> App<S> {
    /// Create a new app instance.
    pub fn new(config: &Config, sink: S) -> Self {
        Self {
            timer: SessionTimer::new(),
            cues: CueTracker::from_config(config),
            reasons: config.reason_vocabulary(),
            status: Some("Press space to start compressions, ? for help".to_string()),
            alert: None,
            show_help: false,
            reason_prompt: config.timer.pause_reason_prompt,
            target_ccf: config.storage.target_ccf_percent,
            saved_id: None,
            sink,
        }
    }

    /// Advance the clock by one frame and check cues.
    pub fn advance(&mut self, delta_ms: u64) {
        self.timer.tick(delta_ms);
        if let Some(alert) = self.cues.update(&self.timer, delta_ms).pop() {
            self.alert = Some(alert);
            self.status = Some(alert.message().to_string());
        }
        if self.alert == Some(CueAlert::BreathsDue)
            && !self.cues.status(&self.timer).breath.is_some_and(|b| b.breaths_due)
        {
            self.alert = None;
        }
    }

    /// Count the time since the last frame in the current mode, then apply
    /// the action that arrived at the end of it.
    pub fn apply_after(&mut self, delta_ms: u64, action: Action) {
        self.advance(delta_ms);
        self.apply(action);
    }

    /// Apply a user action.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => {}
            Action::CompressionsOn => self.compressions_on(),
            Action::Pause => {
                let result = self.timer.pause(Vec::new());
                self.report(result, "Paused: hands off");
            }
            Action::ToggleReason(index) => self.toggle_reason(index),
            Action::ClearReasons => self.clear_reasons(),
            Action::ToggleAirway => {
                let on = self.cues.toggle_advanced_airway();
                self.status = Some(format!(
                    "Advanced airway {}",
                    if on { "on" } else { "off" }
                ));
            }
            Action::AcknowledgePulse => {
                self.cues.acknowledge_pulse(&self.timer);
                if self.alert == Some(CueAlert::PulseCheckDue) {
                    self.alert = None;
                }
                self.status = Some("Pulse check acknowledged".to_string());
            }
            Action::End => self.end_session(),
            Action::Reset => self.reset(),
            Action::Help => self.show_help = !self.show_help,
        }
    }

    fn compressions_on(&mut self) {
        let result = match self.timer.mode() {
            Mode::Paused => self.timer.resume(),
            _ => self.timer.start(),
        };
        if self.alert == Some(CueAlert::LongPause) {
            self.alert = None;
        }
        self.report(result, "Compressions on");
    }

    fn toggle_reason(&mut self, index: usize) {
        let Some(reason) = self.reasons.get(index).cloned() else {
            return;
        };

        let selected = self
            .timer
            .current_pause_reasons()
            .is_some_and(|set| set.contains(&reason));
        let result = if selected {
            self.timer.remove_pause_reason(&reason)
        } else {
            self.timer.add_pause_reason(reason)
        };

        match result {
            Ok(_) => self.status = self.timer.current_pause_reasons().and_then(|r| r.joined()),
            Err(e) => self.reject(&e),
        }
    }

    fn clear_reasons(&mut self) {
        let current: Vec<PauseReason> = self
            .timer
            .current_pause_reasons()
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        for reason in &current {
            if let Err(e) = self.timer.remove_pause_reason(reason) {
                self.reject(&e);
                return;
            }
        }
        self.status = Some("Reasons cleared".to_string());
    }

    /// End the session and save it through the sink.
    pub fn end_session(&mut self) {
        let record = match self.timer.end() {
            Ok(record) => record,
            Err(e) => {
                self.reject(&e);
                return;
            }
        };

        match self.sink.save_session(&record) {
            Ok(id) => {
                info!(id, "session saved from tui");
                self.saved_id = Some(id);
                self.status = Some(format!("Session #{id} saved. Press r for a new session"));
            }
            Err(e) => {
                error!(error = %e, "failed to save session");
                self.status = Some(format!("Session not saved: {e}"));
            }
        }
        self.alert = None;
    }

    /// Discard the current session.
    pub fn reset(&mut self) {
        self.timer.reset();
        self.cues.reset();
        self.alert = None;
        self.saved_id = None;
        self.status = Some("Ready".to_string());
    }

    /// The reason picker is visible.
    #[must_use]
    pub fn picker_visible(&self) -> bool {
        self.reason_prompt && self.timer.mode() == Mode::Paused
    }

    fn report(&mut self, result: Result<(), InvalidTransition>, ok: &str) {
        match result {
            Ok(()) => self.status = Some(ok.to_string()),
            Err(e) => self.reject(&e),
        }
    }

    fn reject(&mut self, e: &InvalidTransition) {
        warn!(mode = %e.mode, event = %e.event, "rejected key");
        self.status = Some(e.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MockSessionSink;
    use crate::error::CcfError;

    fn app_with(sink: MockSessionSink) -> App<MockSessionSink> {
        App::new(&Config::default(), sink)
    }

    #[test]
    fn test_time_before_key_counts_in_previous_mode() {
        let mut app = app_with(MockSessionSink::new());
        app.apply(Action::CompressionsOn);

        // frame at t=0, `p` at t=90, next frame at t=100
        app.advance(0);
        app.apply_after(90, Action::Pause);
        app.advance(10);
        assert_eq!(app.timer.compression_ms(), 90);
        assert_eq!(app.timer.hands_off_ms(), 10);

        // resume at t=130
        app.apply_after(30, Action::CompressionsOn);
        app.advance(20);
        assert_eq!(app.timer.hands_off_ms(), 40);
        assert_eq!(app.timer.compression_ms(), 110);
    }

    #[test]
    fn test_time_before_end_is_recorded() {
        let mut sink = MockSessionSink::new();
        sink.expect_save_session()
            .times(1)
            .withf(|record| record.compression_ms == 1_050 && record.total_ms == 1_050)
            .returning(|_| Ok(3));
        let mut app = app_with(sink);

        app.apply(Action::CompressionsOn);
        app.advance(1_000);
        app.apply_after(50, Action::End);
        assert_eq!(app.saved_id, Some(3));
    }

    #[test]
    fn test_space_starts_then_resumes() {
        let mut app = app_with(MockSessionSink::new());

        app.apply(Action::CompressionsOn);
        assert_eq!(app.timer.mode(), Mode::Compressing);

        app.apply(Action::Pause);
        assert_eq!(app.timer.mode(), Mode::Paused);
        assert!(app.picker_visible());

        app.apply(Action::CompressionsOn);
        assert_eq!(app.timer.mode(), Mode::Compressing);
    }

    #[test]
    fn test_toggle_reason_by_index() {
        let mut app = app_with(MockSessionSink::new());
        app.apply(Action::CompressionsOn);
        app.apply(Action::Pause);

        app.apply(Action::ToggleReason(1));
        app.apply(Action::ToggleReason(0));
        let reasons = app.timer.current_pause_reasons().unwrap();
        assert_eq!(reasons.joined().as_deref(), Some("Shock, Rhythm/Analysis"));

        app.apply(Action::ToggleReason(1));
        assert_eq!(app.timer.current_pause_reasons().unwrap().len(), 1);

        app.apply(Action::ClearReasons);
        assert!(app.timer.current_pause_reasons().unwrap().is_empty());

        // Out of range is ignored
        app.apply(Action::ToggleReason(42));
    }

    #[test]
    fn test_reason_while_compressing_is_rejected() {
        let mut app = app_with(MockSessionSink::new());
        app.apply(Action::CompressionsOn);
        app.apply(Action::ToggleReason(0));

        assert_eq!(
            app.status.as_deref(),
            Some("cannot add a pause reason while Compressing")
        );
    }

    #[test]
    fn test_end_saves_through_sink() {
        let mut sink = MockSessionSink::new();
        sink.expect_save_session()
            .times(1)
            .withf(|record| record.compression_ms == 3_000 && record.hands_off_ms == 1_000)
            .returning(|_| Ok(17));

        let mut app = app_with(sink);
        app.apply(Action::CompressionsOn);
        app.advance(3_000);
        app.apply(Action::Pause);
        app.advance(1_000);
        app.apply(Action::End);

        assert_eq!(app.timer.mode(), Mode::Ended);
        assert_eq!(app.saved_id, Some(17));
        assert_eq!(app.timer.record().unwrap().ccf_percent, Some(75));
    }

    #[test]
    fn test_save_failure_keeps_record() {
        let mut sink = MockSessionSink::new();
        sink.expect_save_session()
            .returning(|_| Err(CcfError::Database("disk full".to_string())));

        let mut app = app_with(sink);
        app.apply(Action::CompressionsOn);
        app.advance(1_000);
        app.apply(Action::End);

        assert!(app.saved_id.is_none());
        assert!(app.timer.record().is_some());
        assert!(app.status.unwrap().contains("disk full"));
    }

    #[test]
    fn test_end_while_idle_does_not_save() {
        let mut sink = MockSessionSink::new();
        sink.expect_save_session().times(0);

        let mut app = app_with(sink);
        app.apply(Action::End);
        assert_eq!(app.timer.mode(), Mode::Idle);
    }

    #[test]
    fn test_long_pause_alert_and_reset() {
        let mut app = app_with(MockSessionSink::new());
        app.apply(Action::CompressionsOn);
        app.advance(1_000);
        app.apply(Action::Pause);
        app.advance(10_000);
        assert_eq!(app.alert, Some(CueAlert::LongPause));

        app.apply(Action::Reset);
        assert_eq!(app.timer.mode(), Mode::Idle);
        assert!(app.alert.is_none());
    }
}
