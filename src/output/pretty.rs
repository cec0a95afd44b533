use colored::{ColoredString, Colorize};

use crate::core::{
    ActivePause, Mode, PauseEvent, PauseReason, ReasonTotal, SessionRecord, TimerSnapshot,
};
use crate::features::sessions::StoredSession;

/// Format milliseconds as `MM:SS`, rounding down to the second.
#[must_use]
pub fn format_mmss(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Format a CCF value, showing `—%` when it is undefined.
#[must_use]
pub fn format_ccf(ccf: Option<u8>) -> String {
    ccf.map_or_else(|| "—%".to_string(), |c| format!("{c}%"))
}

/// CCF colored against a target: green at or above, yellow within ten
/// points, red below that.
#[must_use]
pub fn ccf_colored(ccf: Option<u8>, target: u8) -> ColoredString {
    let text = format_ccf(ccf);
    match ccf {
        None => text.dimmed(),
        Some(c) if c >= target => text.green().bold(),
        Some(c) if c.saturating_add(10) >= target => text.yellow().bold(),
        Some(_) => text.red().bold(),
    }
}

fn reasons_or_none(pause_reasons: Option<String>) -> ColoredString {
    pause_reasons.map_or_else(|| "no reason".dimmed(), |r| r.cyan())
}

fn format_pause_line(index: usize, pause: &PauseEvent) -> String {
    format!(
        "  {:>3}. {}  {:>5}  {}\n",
        index + 1,
        format!("+{}", format_mmss(pause.offset_ms)).dimmed(),
        format_mmss(pause.duration_ms),
        reasons_or_none(pause.reasons.joined())
    )
}

fn format_reason_totals(totals: &[ReasonTotal], output: &mut String) {
    if totals.is_empty() {
        return;
    }
    output.push_str(&format!("  {}:\n", "Pauses by reason".dimmed()));
    for total in totals {
        output.push_str(&format!(
            "    {:<22} {:>5}  ({}x)\n",
            total.reason.as_str(),
            format_mmss(total.total_ms),
            total.count
        ));
    }
}

/// Format a finished session summary.
#[must_use]
pub fn format_record_pretty(record: &SessionRecord, id: Option<i64>, target: u8) -> String {
    let title = id.map_or_else(|| "Session".to_string(), |id| format!("Session #{id}"));

    let mut output = format!(
        "{}  {}\n",
        title.bold(),
        record.started_at.format("%Y-%m-%d %H:%M:%S UTC").to_string().dimmed()
    );
    output.push_str(&format!(
        "  {}: {}\n",
        "CCF".dimmed(),
        ccf_colored(record.ccf_percent, target)
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Total".dimmed(),
        format_mmss(record.total_ms)
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Compressions".dimmed(),
        format_mmss(record.compression_ms)
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Hands-off".dimmed(),
        format_mmss(record.hands_off_ms)
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Pauses".dimmed(),
        record.pause_count
    ));

    if let Some(longest) = &record.longest_pause {
        output.push_str(&format!(
            "  {}: {} ({})\n",
            "Longest pause".dimmed(),
            format_mmss(longest.duration_ms),
            reasons_or_none(longest.reasons.joined())
        ));
    }

    if !record.pause_log.is_empty() {
        output.push_str(&format!("  {}:\n", "Pause log".dimmed()));
        for (i, pause) in record.pause_log.iter().enumerate() {
            output.push_str(&format_pause_line(i, pause));
        }
    }

    format_reason_totals(&record.pauses_by_reason(), &mut output);
    output
}

/// Format a saved session.
#[must_use]
pub fn format_session_pretty(session: &StoredSession, target: u8) -> String {
    format_record_pretty(&session.record, Some(session.id), target)
}

/// Format saved sessions as a table, newest first.
#[must_use]
pub fn format_sessions_pretty(sessions: &[StoredSession], target: u8) -> String {
    if sessions.is_empty() {
        return "Sessions (0)\n  No sessions recorded".to_string();
    }

    let mut output = format!("Sessions ({})\n", sessions.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for session in sessions {
        let record = &session.record;
        output.push_str(&format!(
            "{:>5}  {}  {:>5}  {:>5} hands-off  {:>3} pauses  {}\n",
            format!("#{}", session.id).bold(),
            record.started_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            ccf_colored(record.ccf_percent, target),
            format_mmss(record.hands_off_ms),
            record.pause_count,
            format_mmss(record.total_ms)
        ));
    }

    output
}

fn mode_colored(mode: Mode) -> ColoredString {
    match mode {
        Mode::Idle => mode.display_name().white(),
        Mode::Compressing => mode.display_name().green().bold(),
        Mode::Paused => mode.display_name().red().bold(),
        Mode::Ended => mode.display_name().blue(),
    }
}

fn format_active_pause(pause: &ActivePause) -> String {
    format!(
        "  {}: {} ({})\n",
        "Current pause".dimmed(),
        format_mmss(pause.duration_ms),
        reasons_or_none(pause.reasons.joined())
    )
}

/// Format a live timer snapshot.
#[must_use]
pub fn format_snapshot_pretty(snapshot: &TimerSnapshot, target: u8) -> String {
    let mut output = format!("{}: {}\n", "Timer".bold(), mode_colored(snapshot.mode));
    output.push_str(&format!(
        "  {}: {}\n",
        "CCF".dimmed(),
        ccf_colored(snapshot.ccf_percent, target)
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Elapsed".dimmed(),
        format_mmss(snapshot.elapsed_ms)
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Hands-off".dimmed(),
        format_mmss(snapshot.hands_off_ms)
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Pauses".dimmed(),
        snapshot.pause_count
    ));

    if let Some(pause) = &snapshot.current_pause {
        output.push_str(&format_active_pause(pause));
    }
    if let Some(longest) = &snapshot.longest_pause {
        output.push_str(&format!(
            "  {}: {}\n",
            "Longest pause".dimmed(),
            format_mmss(longest.duration_ms)
        ));
    }

    format_reason_totals(&snapshot.pauses_by_reason, &mut output);
    output
}

/// Format the reason vocabulary with the keys that toggle each reason.
#[must_use]
pub fn format_reasons_pretty(reasons: &[PauseReason]) -> String {
    let mut output = format!("Pause reasons ({})\n", reasons.len());
    output.push_str(&"─".repeat(40));
    output.push('\n');

    for (i, reason) in reasons.iter().enumerate() {
        let key = if i < 9 {
            format!("[{}]", i + 1)
        } else {
            "   ".to_string()
        };
        output.push_str(&format!("{} {}\n", key.dimmed(), reason));
    }

    output
}
