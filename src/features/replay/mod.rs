//! Scripted replay of a training session.
//!
//! Drives a [`SessionTimer`] from a script instead of a wall clock, so
//! sessions can be reproduced exactly.

pub mod parser;

use tracing::{debug, warn};

use crate::core::{InvalidTransition, SessionRecord, SessionTimer, TimerSnapshot};
use crate::error::CcfError;

pub use parser::{parse_duration_ms, parse_script, ScriptLine, Step};

/// What a replay produced.
#[derive(Debug, Clone)]
pub struct ReplayResult {
    /// Every session ended by the script, in order.
    pub records: Vec<SessionRecord>,
    /// Timer state after the last step.
    pub snapshot: TimerSnapshot,
    /// Lines skipped in lenient mode.
    pub skipped: Vec<usize>,
}

impl ReplayResult {
    /// The record of the session still on screen, if the script ended it.
    #[must_use]
    pub fn final_record(&self) -> Option<&SessionRecord> {
        if self.snapshot.mode == crate::core::Mode::Ended {
            self.records.last()
        } else {
            None
        }
    }
}

/// Applies script steps to a timer.
#[derive(Debug, Default)]
pub struct Replayer {
    timer: SessionTimer,
    lenient: bool,
    records: Vec<SessionRecord>,
    skipped: Vec<usize>,
}

impl Replayer {
    /// Create a replayer. In lenient mode invalid transitions are logged and
    /// skipped instead of aborting.
    #[must_use]
    pub fn new(lenient: bool) -> Self {
        Self {
            lenient,
            ..Self::default()
        }
    }

    /// Apply one step.
    ///
    /// # Errors
    ///
    /// Returns `CcfError::Script` for an invalid transition unless lenient.
    pub fn apply(&mut self, line: &ScriptLine) -> Result<(), CcfError> {
        debug!(line = line.line, step = ?line.step, "replay step");

        match self.step(&line.step) {
            Ok(()) => Ok(()),
            Err(e) if self.lenient => {
                warn!(line = line.line, error = %e, "skipping invalid step");
                self.skipped.push(line.line);
                Ok(())
            }
            Err(e) => Err(CcfError::Script {
                line: line.line,
                message: e.to_string(),
            }),
        }
    }

    fn step(&mut self, step: &Step) -> Result<(), InvalidTransition> {
        match step {
            Step::Start => self.timer.start(),
            Step::Tick(ms) => {
                self.timer.tick(*ms);
                Ok(())
            }
            Step::Pause(reasons) => self.timer.pause(reasons.iter().cloned()),
            Step::AddReason(reason) => self.timer.add_pause_reason(reason.clone()).map(|_| ()),
            Step::RemoveReason(reason) => self.timer.remove_pause_reason(reason).map(|_| ()),
            Step::Resume => self.timer.resume(),
            Step::End => {
                let record = self.timer.end()?;
                self.records.push(record);
                Ok(())
            }
            Step::Reset => {
                self.timer.reset();
                Ok(())
            }
        }
    }

    #[must_use]
    pub const fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    /// Finish and collect the results.
    #[must_use]
    pub fn finish(self) -> ReplayResult {
        ReplayResult {
            snapshot: self.timer.snapshot(),
            records: self.records,
            skipped: self.skipped,
        }
    }
}

/// Parse and run a whole script.
///
/// # Errors
///
/// Returns `CcfError::Script` for the first unparseable line, or the first
/// invalid transition unless `lenient`.
pub fn run_script(source: &str, lenient: bool) -> Result<ReplayResult, CcfError> {
    let steps = parse_script(source)?;
    let mut replayer = Replayer::new(lenient);
    for line in &steps {
        replayer.apply(line)?;
    }
    Ok(replayer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Mode;

    #[test]
    fn test_replay_single_session() {
        let script = "
            start
            tick 60s
            pause Rhythm/Analysis, Shock
            tick 8s
            reason - Shock
            reason + Pulse Check
            resume
            tick 52s
            end
        ";
        let result = run_script(script, false).unwrap();

        let record = result.final_record().unwrap();
        assert_eq!(record.compression_ms, 112_000);
        assert_eq!(record.hands_off_ms, 8_000);
        assert_eq!(record.ccf_percent, Some(93));
        assert_eq!(
            record.pause_log[0].reasons.joined().as_deref(),
            Some("Rhythm/Analysis, Pulse Check")
        );
    }

    #[test]
    fn test_replay_without_end_gives_snapshot() {
        let result = run_script("start\ntick 5s\npause\ntick 2s\n", false).unwrap();

        assert!(result.final_record().is_none());
        assert_eq!(result.snapshot.mode, Mode::Paused);
        assert_eq!(result.snapshot.hands_off_ms, 2_000);
        assert_eq!(result.snapshot.current_pause.unwrap().duration_ms, 2_000);
    }

    #[test]
    fn test_invalid_transition_aborts() {
        let err = run_script("start\ntick 1s\nend\nresume\n", false).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Script error on line 4: cannot resume while Ended"
        );
    }

    #[test]
    fn test_lenient_skips_invalid_transitions() {
        let result = run_script("resume\nstart\ntick 3s\nreason + Shock\nend\n", true).unwrap();

        assert_eq!(result.skipped, vec![1, 4]);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].ccf_percent, Some(100));
    }

    #[test]
    fn test_reset_allows_several_sessions() {
        let script = "start\ntick 10s\nend\nreset\nstart\ntick 20s\npause\ntick 20s\nend\n";
        let result = run_script(script, false).unwrap();

        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[1].ccf_percent, Some(50));
        assert_eq!(result.final_record(), result.records.last());
    }
}
