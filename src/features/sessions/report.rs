//! Session reports.
//!
//! Aggregates saved sessions over a period.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::storage::{SessionStore, StoredSession};
use crate::core::{metrics, PauseEvent, ReasonTotal};
use crate::error::CcfError;
use crate::output::{format_ccf, format_mmss};

/// Report time period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    /// Today only
    Today,
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
    /// All time
    AllTime,
}

impl ReportPeriod {
    /// Start (inclusive) and end (exclusive) of this period as of `now`.
    #[must_use]
    pub fn date_range_at(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let today = now.date_naive();
        let end = day_start(today.checked_add_days(Days::new(1)).unwrap_or(today));

        let start = match self {
            Self::Today => day_start(today),
            Self::Week => day_start(today.checked_sub_days(Days::new(6)).unwrap_or(today)),
            Self::Month => day_start(today.checked_sub_days(Days::new(29)).unwrap_or(today)),
            Self::AllTime => DateTime::UNIX_EPOCH,
        };
        (start, end)
    }

    /// Start and end of this period as of now.
    #[must_use]
    pub fn date_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        self.date_range_at(Utc::now())
    }

    /// Parse period from string.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown period name.
    pub fn parse(s: &str) -> Result<Self, CcfError> {
        match s.trim().to_lowercase().as_str() {
            "today" | "t" | "d" => Ok(Self::Today),
            "week" | "w" | "7d" => Ok(Self::Week),
            "month" | "m" | "30d" => Ok(Self::Month),
            "all" | "alltime" | "all-time" => Ok(Self::AllTime),
            other => Err(CcfError::InvalidInput(format!(
                "Unknown report period '{other}' (expected today, week, month or all)"
            ))),
        }
    }

    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Week => "Last 7 Days",
            Self::Month => "Last 30 Days",
            Self::AllTime => "All Time",
        }
    }
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Aggregate over saved sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Report period name
    pub period: String,
    pub session_count: usize,
    /// Sessions with a defined CCF
    pub rated_sessions: usize,
    pub average_ccf: Option<f64>,
    pub best_ccf: Option<u8>,
    pub worst_ccf: Option<u8>,
    pub total_compression_ms: u64,
    pub total_hands_off_ms: u64,
    pub average_hands_off_ms: u64,
    pub total_pauses: u64,
    pub longest_pause: Option<PauseEvent>,
    pub by_reason: Vec<ReasonTotal>,
    pub target_ccf_percent: u8,
    /// Rated sessions at or above the target
    pub sessions_meeting_target: usize,
}

impl SessionReport {
    /// Generate a report for the given period.
    ///
    /// # Errors
    ///
    /// Returns an error if the sessions cannot be loaded.
    pub fn generate(
        store: &SessionStore,
        period: ReportPeriod,
        target_ccf_percent: u8,
    ) -> Result<Self, CcfError> {
        let (start, end) = period.date_range();
        let sessions = store.range(start, end)?;
        Ok(Self::from_sessions(
            period.display_name(),
            &sessions,
            target_ccf_percent,
        ))
    }

    /// Aggregate already loaded sessions.
    #[must_use]
    pub fn from_sessions(period: &str, sessions: &[StoredSession], target_ccf_percent: u8) -> Self {
        let records: Vec<_> = sessions.iter().map(|s| &s.record).collect();
        let ccfs: Vec<u8> = records.iter().filter_map(|r| r.ccf_percent).collect();

        #[allow(clippy::cast_precision_loss)]
        let average_ccf = (!ccfs.is_empty())
            .then(|| ccfs.iter().map(|&c| f64::from(c)).sum::<f64>() / ccfs.len() as f64);

        let total_hands_off_ms: u64 = records.iter().map(|r| r.hands_off_ms).sum();
        let pauses = || records.iter().copied().flat_map(|r| r.pause_log.iter());

        Self {
            period: period.to_string(),
            session_count: records.len(),
            rated_sessions: ccfs.len(),
            average_ccf,
            best_ccf: ccfs.iter().copied().max(),
            worst_ccf: ccfs.iter().copied().min(),
            total_compression_ms: records.iter().map(|r| r.compression_ms).sum(),
            total_hands_off_ms,
            average_hands_off_ms: total_hands_off_ms
                .checked_div(records.len() as u64)
                .unwrap_or(0),
            total_pauses: records.iter().map(|r| u64::from(r.pause_count)).sum(),
            longest_pause: metrics::longest_pause(pauses()).cloned(),
            by_reason: metrics::pauses_by_reason(pauses()),
            target_ccf_percent,
            sessions_meeting_target: ccfs.iter().filter(|&&c| c >= target_ccf_percent).count(),
        }
    }

    /// Share of rated sessions meeting the target, as a whole percentage.
    #[must_use]
    pub fn target_hit_percent(&self) -> Option<u8> {
        metrics::ccf_percent(
            self.sessions_meeting_target as u64,
            self.rated_sessions as u64,
        )
    }

    /// Format the report for display.
    #[must_use]
    pub fn format(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("CCF Report: {}", self.period));
        lines.push("═".repeat(50));
        lines.push(String::new());

        if self.session_count == 0 {
            lines.push("No sessions recorded in this period.".to_string());
            return lines.join("\n");
        }

        lines.push("Summary".to_string());
        lines.push("─".repeat(40));
        lines.push(format!("  Sessions:            {}", self.session_count));
        lines.push(format!(
            "  Average CCF:         {}",
            self.average_ccf
                .map_or_else(|| "—%".to_string(), |c| format!("{c:.1}%"))
        ));
        lines.push(format!("  Best CCF:            {}", format_ccf(self.best_ccf)));
        lines.push(format!("  Worst CCF:           {}", format_ccf(self.worst_ccf)));
        lines.push(format!(
            "  Meeting {}% target:  {}/{} ({})",
            self.target_ccf_percent,
            self.sessions_meeting_target,
            self.rated_sessions,
            format_ccf(self.target_hit_percent())
        ));
        lines.push(String::new());

        lines.push("Hands-off".to_string());
        lines.push("─".repeat(40));
        lines.push(format!(
            "  Total hands-off:     {}",
            format_mmss(self.total_hands_off_ms)
        ));
        lines.push(format!(
            "  Per session:         {}",
            format_mmss(self.average_hands_off_ms)
        ));
        lines.push(format!("  Pauses:              {}", self.total_pauses));
        if let Some(pause) = &self.longest_pause {
            lines.push(format!(
                "  Longest pause:       {} ({})",
                format_mmss(pause.duration_ms),
                pause.reasons.joined().unwrap_or_else(|| "no reason".to_string())
            ));
        }
        lines.push(String::new());

        if !self.by_reason.is_empty() {
            lines.push("Pauses by Reason".to_string());
            lines.push("─".repeat(40));
            for total in &self.by_reason {
                lines.push(format!(
                    "  {:<22} {:>6}  ({}x)",
                    total.reason.as_str(),
                    format_mmss(total.total_ms),
                    total.count
                ));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PauseReason, SessionRecord, SessionTimer};
    use chrono::TimeZone;

    fn stored(id: i64, compress_ms: u64, pause_ms: u64, reason: &str) -> StoredSession {
        let mut timer = SessionTimer::new();
        timer
            .start_at(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap())
            .unwrap();
        timer.tick(compress_ms);
        timer.pause(PauseReason::new(reason)).unwrap();
        timer.tick(pause_ms);
        StoredSession {
            id,
            record: timer.end().unwrap(),
        }
    }

    #[test]
    fn test_report_period_today() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 15, 30, 0).unwrap();
        let (start, end) = ReportPeriod::Today.date_range_at(now);

        assert_eq!(start, Utc.with_ymd_and_hms(2024, 5, 10, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 5, 11, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_report_period_week() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 15, 30, 0).unwrap();
        let (start, _) = ReportPeriod::Week.date_range_at(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 5, 4, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_report_period_parse() {
        assert_eq!(ReportPeriod::parse("today").unwrap(), ReportPeriod::Today);
        assert_eq!(ReportPeriod::parse("Week").unwrap(), ReportPeriod::Week);
        assert_eq!(ReportPeriod::parse("30d").unwrap(), ReportPeriod::Month);
        assert_eq!(ReportPeriod::parse("all").unwrap(), ReportPeriod::AllTime);
        assert!(ReportPeriod::parse("fortnight").is_err());
    }

    #[test]
    fn test_from_sessions() {
        let sessions = vec![
            stored(1, 90_000, 10_000, "Shock"),
            stored(2, 70_000, 30_000, "Pulse Check"),
            stored(3, 80_000, 20_000, "Shock"),
        ];

        let report = SessionReport::from_sessions("Test", &sessions, 80);
        assert_eq!(report.session_count, 3);
        assert_eq!(report.best_ccf, Some(90));
        assert_eq!(report.worst_ccf, Some(70));
        assert!((report.average_ccf.unwrap() - 80.0).abs() < 1e-9);
        assert_eq!(report.total_hands_off_ms, 60_000);
        assert_eq!(report.average_hands_off_ms, 20_000);
        assert_eq!(report.total_pauses, 3);
        assert_eq!(report.sessions_meeting_target, 2);
        assert_eq!(report.target_hit_percent(), Some(67));
        assert_eq!(report.longest_pause.unwrap().duration_ms, 30_000);

        assert_eq!(report.by_reason[0].reason.as_str(), "Pulse Check");
        assert_eq!(report.by_reason[0].total_ms, 30_000);
        assert_eq!(report.by_reason[1].reason.as_str(), "Shock");
        assert_eq!(report.by_reason[1].count, 2);
    }

    #[test]
    fn test_undefined_ccf_is_excluded() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let empty = StoredSession {
            id: 9,
            record: SessionRecord::from_parts(now, now, 0, 0, Vec::new()),
        };
        let sessions = vec![empty, stored(1, 60_000, 0, "Other")];

        let report = SessionReport::from_sessions("Test", &sessions, 80);
        assert_eq!(report.session_count, 2);
        assert_eq!(report.rated_sessions, 1);
        assert_eq!(report.worst_ccf, Some(100));
    }

    #[test]
    fn test_empty_report() {
        let report = SessionReport::from_sessions("Today", &[], 80);
        assert!(report.average_ccf.is_none());
        assert!(report.target_hit_percent().is_none());
        assert!(report.format().contains("No sessions"));
    }

    #[test]
    fn test_format_lists_reasons() {
        let sessions = vec![stored(1, 50_000, 10_000, "Shock")];
        let text = SessionReport::from_sessions("Test", &sessions, 80).format();
        assert!(text.contains("CCF Report: Test"));
        assert!(text.contains("Shock"));
        assert!(text.contains("00:10"));
    }
}
