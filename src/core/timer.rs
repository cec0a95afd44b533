//! The session timer state machine.
//!
//! A [`SessionTimer`] is a passive state container: it never reads a clock
//! after `start` and never schedules anything. The host advances it with
//! [`SessionTimer::tick`] and drives transitions from user input. All
//! timestamps after the session start are derived from the start time plus
//! accumulated session time, so pause durations, the pause log and the
//! hands-off total always agree exactly.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::metrics::{self, ReasonTotal};
use super::reasons::{PauseReason, ReasonSet};
use super::record::{ActivePause, PauseEvent, SessionRecord, TimerSnapshot};

/// Which accumulator, if any, is advancing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Not started yet
    #[default]
    Idle,
    /// Compressions in progress
    Compressing,
    /// Hands off the chest
    Paused,
    /// Session finished
    Ended,
}

impl Mode {
    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Compressing => "Compressing",
            Self::Paused => "Paused",
            Self::Ended => "Ended",
        }
    }

    /// Check if a session is in progress.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::Compressing | Self::Paused)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A user intent applied to the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    Start,
    Pause,
    Resume,
    End,
    AddReason,
    RemoveReason,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::End => "end",
            Self::AddReason => "add a pause reason",
            Self::RemoveReason => "remove a pause reason",
        })
    }
}

/// An event was applied in a mode that has no transition for it.
///
/// The timer is left untouched; callers may ignore, log, or surface it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot {event} while {mode}")]
pub struct InvalidTransition {
    pub mode: Mode,
    pub event: Event,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenPause {
    offset_ms: u64,
    reasons: ReasonSet,
}

/// Tracks compression-on and hands-off time for one training run.
#[derive(Debug, Clone, Default)]
pub struct SessionTimer {
    mode: Mode,
    compression_ms: u64,
    hands_off_ms: u64,
    started_at: Option<DateTime<Utc>>,
    /// Present if and only if `mode == Paused`
    current_pause: Option<OpenPause>,
    pause_log: Vec<PauseEvent>,
    pause_count: u32,
    record: Option<SessionRecord>,
}

impl SessionTimer {
    /// Create an idle timer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start compressions, stamping the session start with the current time.
    ///
    /// A no-op while the session is already running.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] if the session has ended.
    pub fn start(&mut self) -> Result<(), InvalidTransition> {
        self.start_at(Utc::now())
    }

    /// Start compressions with an explicit session start time.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] if the session has ended.
    pub fn start_at(&mut self, now: DateTime<Utc>) -> Result<(), InvalidTransition> {
        match self.mode {
            Mode::Idle => {
                self.started_at = Some(now);
                self.mode = Mode::Compressing;
                debug!(started_at = %now, "session started");
                Ok(())
            }
            Mode::Compressing | Mode::Paused => Ok(()),
            Mode::Ended => Err(self.reject(Event::Start)),
        }
    }

    /// Stop compressions and open a pause seeded with `reasons`.
    ///
    /// A no-op while already paused; the reasons of the repeated call are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] if the session is idle or ended.
    pub fn pause<I>(&mut self, reasons: I) -> Result<(), InvalidTransition>
    where
        I: IntoIterator<Item = PauseReason>,
    {
        match self.mode {
            Mode::Compressing => {
                let offset_ms = self.elapsed_ms();
                self.current_pause = Some(OpenPause {
                    offset_ms,
                    reasons: reasons.into_iter().collect(),
                });
                self.pause_count += 1;
                self.mode = Mode::Paused;
                debug!(offset_ms, pause = self.pause_count, "compressions paused");
                Ok(())
            }
            Mode::Paused => Ok(()),
            Mode::Idle | Mode::Ended => Err(self.reject(Event::Pause)),
        }
    }

    /// Close the current pause and resume compressions.
    ///
    /// A no-op while already compressing.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] if the session is idle or ended.
    pub fn resume(&mut self) -> Result<(), InvalidTransition> {
        match self.mode {
            Mode::Paused => {
                self.finalize_pause();
                self.mode = Mode::Compressing;
                debug!(elapsed_ms = self.elapsed_ms(), "compressions resumed");
                Ok(())
            }
            Mode::Compressing => Ok(()),
            Mode::Idle | Mode::Ended => Err(self.reject(Event::Resume)),
        }
    }

    /// End the session, closing any open pause, and return its record.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] if the session is idle or already ended.
    pub fn end(&mut self) -> Result<SessionRecord, InvalidTransition> {
        if !self.mode.is_running() {
            return Err(self.reject(Event::End));
        }

        self.finalize_pause();
        self.mode = Mode::Ended;

        let started_at = self.started_at.unwrap_or_default();
        let record = SessionRecord {
            started_at,
            ended_at: self.timestamp(self.elapsed_ms()),
            total_ms: self.elapsed_ms(),
            compression_ms: self.compression_ms,
            hands_off_ms: self.hands_off_ms,
            ccf_percent: self.ccf_percent(),
            pause_count: self.pause_count,
            pause_log: self.pause_log.clone(),
            longest_pause: metrics::longest_pause(&self.pause_log).cloned(),
        };
        debug!(
            total_ms = record.total_ms,
            ccf = ?record.ccf_percent,
            pauses = record.pause_count,
            "session ended"
        );
        self.record = Some(record.clone());
        Ok(record)
    }

    /// Discard all state and return to idle. Accepted in every mode.
    pub fn reset(&mut self) {
        debug!(mode = %self.mode, "session reset");
        *self = Self::new();
    }

    /// Add a reason to the open pause. Returns whether the set changed.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] if not paused.
    pub fn add_pause_reason(&mut self, reason: PauseReason) -> Result<bool, InvalidTransition> {
        match self.current_pause.as_mut() {
            Some(pause) => Ok(pause.reasons.insert(reason)),
            None => Err(self.reject(Event::AddReason)),
        }
    }

    /// Remove a reason from the open pause. Returns whether the set changed.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] if not paused.
    pub fn remove_pause_reason(
        &mut self,
        reason: &PauseReason,
    ) -> Result<bool, InvalidTransition> {
        match self.current_pause.as_mut() {
            Some(pause) => Ok(pause.reasons.remove(reason)),
            None => Err(self.reject(Event::RemoveReason)),
        }
    }

    /// Advance the accumulator for the current mode by `delta_ms`.
    pub fn tick(&mut self, delta_ms: u64) {
        match self.mode {
            Mode::Compressing => {
                self.compression_ms = self.compression_ms.saturating_add(delta_ms);
            }
            Mode::Paused => {
                self.hands_off_ms = self.hands_off_ms.saturating_add(delta_ms);
            }
            Mode::Idle | Mode::Ended => {}
        }
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub const fn compression_ms(&self) -> u64 {
        self.compression_ms
    }

    #[must_use]
    pub const fn hands_off_ms(&self) -> u64 {
        self.hands_off_ms
    }

    /// When compressions first started.
    #[must_use]
    pub const fn session_started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub const fn pause_count(&self) -> u32 {
        self.pause_count
    }

    /// Finalized pauses, oldest first.
    #[must_use]
    pub fn pause_log(&self) -> &[PauseEvent] {
        &self.pause_log
    }

    /// The record produced by `end`, kept until `reset`.
    #[must_use]
    pub const fn record(&self) -> Option<&SessionRecord> {
        self.record.as_ref()
    }

    /// When the open pause began.
    #[must_use]
    pub fn current_pause_started_at(&self) -> Option<DateTime<Utc>> {
        self.current_pause
            .as_ref()
            .map(|p| self.timestamp(p.offset_ms))
    }

    /// Reasons of the open pause.
    #[must_use]
    pub fn current_pause_reasons(&self) -> Option<&ReasonSet> {
        self.current_pause.as_ref().map(|p| &p.reasons)
    }

    /// How long the open pause has lasted so far.
    #[must_use]
    pub fn current_pause_ms(&self) -> Option<u64> {
        self.current_pause
            .as_ref()
            .map(|p| self.elapsed_ms().saturating_sub(p.offset_ms))
    }

    /// Compression time plus hands-off time.
    #[must_use]
    pub const fn elapsed_ms(&self) -> u64 {
        self.compression_ms.saturating_add(self.hands_off_ms)
    }

    /// Chest compression fraction, `None` before any time has elapsed.
    #[must_use]
    pub fn ccf_percent(&self) -> Option<u8> {
        metrics::ccf_percent(self.compression_ms, self.elapsed_ms())
    }

    /// The longest pause so far, counting the open pause up to now.
    #[must_use]
    pub fn longest_pause(&self) -> Option<PauseEvent> {
        let open = self.open_pause_event();
        metrics::longest_pause(self.pause_log.iter().chain(open.as_ref())).cloned()
    }

    /// Finalized hands-off time grouped by reason.
    #[must_use]
    pub fn pauses_by_reason(&self) -> Vec<ReasonTotal> {
        metrics::pauses_by_reason(&self.pause_log)
    }

    /// Capture the current state for display or serialization.
    #[must_use]
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.mode,
            started_at: self.started_at,
            elapsed_ms: self.elapsed_ms(),
            compression_ms: self.compression_ms,
            hands_off_ms: self.hands_off_ms,
            ccf_percent: self.ccf_percent(),
            pause_count: self.pause_count,
            current_pause: self.current_pause.as_ref().map(|p| ActivePause {
                started_at: self.timestamp(p.offset_ms),
                duration_ms: self.elapsed_ms().saturating_sub(p.offset_ms),
                reasons: p.reasons.clone(),
            }),
            pause_log: self.pause_log.clone(),
            longest_pause: self.longest_pause(),
            pauses_by_reason: self.pauses_by_reason(),
        }
    }

    fn open_pause_event(&self) -> Option<PauseEvent> {
        self.current_pause.as_ref().map(|p| {
            let now_ms = self.elapsed_ms();
            PauseEvent {
                offset_ms: p.offset_ms,
                started_at: self.timestamp(p.offset_ms),
                ended_at: self.timestamp(now_ms),
                duration_ms: now_ms.saturating_sub(p.offset_ms),
                reasons: p.reasons.clone(),
            }
        })
    }

    fn finalize_pause(&mut self) {
        if let Some(event) = self.open_pause_event() {
            let reasons = event.reasons.joined().unwrap_or_default();
            debug!(duration_ms = event.duration_ms, %reasons, "pause finalized");
            self.pause_log.push(event);
        }
        self.current_pause = None;
    }

    fn timestamp(&self, offset_ms: u64) -> DateTime<Utc> {
        let origin = self.started_at.unwrap_or_default();
        i64::try_from(offset_ms)
            .ok()
            .and_then(Duration::try_milliseconds)
            .and_then(|d| origin.checked_add_signed(d))
            .unwrap_or(origin)
    }

    fn reject(&self, event: Event) -> InvalidTransition {
        InvalidTransition {
            mode: self.mode,
            event,
        }
    }
}
