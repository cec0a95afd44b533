//! Replay script parser.
//!
//! One command per line:
//!
//! ```text
//! start
//! tick 1m30s
//! pause Shock, Pulse Check
//! reason + Airway/Ventilation
//! reason - Shock
//! resume
//! end
//! ```
//!
//! `#` starts a comment. Durations accept `h`, `m`, `s` and `ms` parts;
//! a bare number is seconds.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::{parse_reason_list, PauseReason};
use crate::error::CcfError;

/// A single scripted action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Start,
    /// Advance the clock by this many milliseconds.
    Tick(u64),
    Pause(Vec<PauseReason>),
    AddReason(PauseReason),
    RemoveReason(PauseReason),
    Resume,
    End,
    Reset,
}

/// A step and the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub step: Step,
}

static DURATION_PART: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*(ms|h|m|s)").unwrap_or_else(|e| panic!("Invalid duration regex: {e}"))
});

static TICK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:tick|wait)\s+(.+)$").unwrap_or_else(|e| panic!("Invalid tick regex: {e}"))
});

static PAUSE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // "pause", "pause Shock", "pause [Shock, Pulse Check]"
    Regex::new(r"(?i)^pause(?:\s+\[?([^\]]*)\]?)?$")
        .unwrap_or_else(|e| panic!("Invalid pause regex: {e}"))
});

static REASON_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^reason\s*([+-])\s*(.+)$")
        .unwrap_or_else(|e| panic!("Invalid reason regex: {e}"))
});

/// Parse a duration such as `30s`, `1m30s`, `500ms` or `45`.
#[must_use]
pub fn parse_duration_ms(s: &str) -> Option<u64> {
    let s = s.trim().to_lowercase();
    if s.is_empty() {
        return None;
    }

    if let Ok(seconds) = s.parse::<u64>() {
        return seconds.checked_mul(1000);
    }

    let mut total: u64 = 0;
    let mut consumed = 0;
    for caps in DURATION_PART.captures_iter(&s) {
        let whole = caps.get(0)?;
        // Parts must be contiguous, with only whitespace between them
        if !s[consumed..whole.start()].trim().is_empty() {
            return None;
        }
        consumed = whole.end();

        let n: u64 = caps[1].parse().ok()?;
        let unit_ms = match &caps[2] {
            "h" => 3_600_000,
            "m" => 60_000,
            "s" => 1_000,
            _ => 1,
        };
        total = total.checked_add(n.checked_mul(unit_ms)?)?;
    }

    (consumed > 0 && s[consumed..].trim().is_empty()).then_some(total)
}

fn parse_line(text: &str) -> Result<Step, String> {
    let lower = text.to_lowercase();
    match lower.as_str() {
        "start" => return Ok(Step::Start),
        "resume" => return Ok(Step::Resume),
        "end" => return Ok(Step::End),
        "reset" => return Ok(Step::Reset),
        _ => {}
    }

    if let Some(caps) = TICK_PATTERN.captures(text) {
        return parse_duration_ms(&caps[1])
            .map(Step::Tick)
            .ok_or_else(|| format!("invalid duration '{}'", &caps[1]));
    }

    if let Some(caps) = PAUSE_PATTERN.captures(text) {
        let reasons = caps
            .get(1)
            .map(|m| parse_reason_list(m.as_str()))
            .unwrap_or_default();
        return Ok(Step::Pause(reasons));
    }

    if let Some(caps) = REASON_PATTERN.captures(text) {
        let reason = PauseReason::new(&caps[2]).ok_or_else(|| "empty reason".to_string())?;
        return Ok(if &caps[1] == "+" {
            Step::AddReason(reason)
        } else {
            Step::RemoveReason(reason)
        });
    }

    Err(format!("unknown command '{text}'"))
}

/// Parse a whole script.
///
/// # Errors
///
/// Returns `CcfError::Script` naming the first line that cannot be parsed.
pub fn parse_script(source: &str) -> Result<Vec<ScriptLine>, CcfError> {
    let mut steps = Vec::new();

    for (i, raw) in source.lines().enumerate() {
        let text = raw.split('#').next().unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }

        let step = parse_line(text).map_err(|message| CcfError::Script {
            line: i + 1,
            message,
        })?;
        steps.push(ScriptLine { line: i + 1, step });
    }

    Ok(steps)
}
