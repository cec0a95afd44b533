//! Pause events and session summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::metrics::{self, ReasonTotal};
use super::reasons::ReasonSet;
use super::timer::Mode;

/// A finalized hands-off interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseEvent {
    /// Session time (ms since the session started) at which the pause began
    pub offset_ms: u64,
    /// When the pause began
    pub started_at: DateTime<Utc>,
    /// When compressions resumed or the session ended
    pub ended_at: DateTime<Utc>,
    /// `ended_at - started_at` in milliseconds
    pub duration_ms: u64,
    /// Reasons selected for this pause
    pub reasons: ReasonSet,
}

/// Immutable summary of a finished training run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// When compressions first started
    pub started_at: DateTime<Utc>,
    /// When the session was ended
    pub ended_at: DateTime<Utc>,
    /// Compression time plus hands-off time
    pub total_ms: u64,
    /// Time spent compressing
    pub compression_ms: u64,
    /// Time spent hands-off
    pub hands_off_ms: u64,
    /// Chest compression fraction, `None` if no time elapsed
    pub ccf_percent: Option<u8>,
    /// Number of pauses
    pub pause_count: u32,
    /// Every pause in order
    pub pause_log: Vec<PauseEvent>,
    /// The longest pause, if any
    pub longest_pause: Option<PauseEvent>,
}

impl SessionRecord {
    /// Hands-off time grouped by reason.
    #[must_use]
    pub fn pauses_by_reason(&self) -> Vec<ReasonTotal> {
        metrics::pauses_by_reason(&self.pause_log)
    }

    /// Rebuild a record from stored parts, recomputing derived fields.
    #[must_use]
    pub fn from_parts(
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        compression_ms: u64,
        hands_off_ms: u64,
        pause_log: Vec<PauseEvent>,
    ) -> Self {
        let total_ms = compression_ms.saturating_add(hands_off_ms);
        let longest_pause = metrics::longest_pause(&pause_log).cloned();
        #[allow(clippy::cast_possible_truncation)]
        let pause_count = pause_log.len() as u32;

        Self {
            started_at,
            ended_at,
            total_ms,
            compression_ms,
            hands_off_ms,
            ccf_percent: metrics::ccf_percent(compression_ms, total_ms),
            pause_count,
            pause_log,
            longest_pause,
        }
    }
}

/// The in-progress pause as seen at the current instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePause {
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub reasons: ReasonSet,
}

/// Point-in-time view of a timer, for status displays of unfinished runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: Mode,
    pub started_at: Option<DateTime<Utc>>,
    pub elapsed_ms: u64,
    pub compression_ms: u64,
    pub hands_off_ms: u64,
    pub ccf_percent: Option<u8>,
    pub pause_count: u32,
    pub current_pause: Option<ActivePause>,
    pub pause_log: Vec<PauseEvent>,
    pub longest_pause: Option<PauseEvent>,
    pub pauses_by_reason: Vec<ReasonTotal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reasons::PauseReason;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_from_parts_recomputes_derived_fields() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let pause_start = start + Duration::seconds(30);
        let pause = PauseEvent {
            offset_ms: 30_000,
            started_at: pause_start,
            ended_at: pause_start + Duration::seconds(10),
            duration_ms: 10_000,
            reasons: [PauseReason::new("Shock").unwrap()].into_iter().collect(),
        };

        let record = SessionRecord::from_parts(
            start,
            start + Duration::seconds(50),
            40_000,
            10_000,
            vec![pause.clone()],
        );

        assert_eq!(record.total_ms, 50_000);
        assert_eq!(record.ccf_percent, Some(80));
        assert_eq!(record.pause_count, 1);
        assert_eq!(record.longest_pause, Some(pause));
        assert_eq!(record.pauses_by_reason()[0].total_ms, 10_000);
    }

    #[test]
    fn test_record_json_shape() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let record = SessionRecord::from_parts(start, start, 0, 0, Vec::new());
        let value = serde_json::to_value(&record).unwrap();

        assert!(value["ccf_percent"].is_null());
        assert_eq!(value["pause_count"], 0);
        assert!(value["pause_log"].as_array().unwrap().is_empty());
        assert!(value["longest_pause"].is_null());
    }
}
