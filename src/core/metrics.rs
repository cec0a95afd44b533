//! Pure metric computations shared by the live timer, finished records and
//! reports.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::reasons::PauseReason;
use super::record::PauseEvent;

/// Accumulated hands-off time for one reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonTotal {
    /// The reason tag
    pub reason: PauseReason,
    /// Sum of the durations of every pause carrying this reason
    pub total_ms: u64,
    /// Number of pauses carrying this reason
    pub count: u32,
}

/// Compression fraction as a whole percentage, rounded half up.
///
/// Returns `None` when no time has elapsed.
#[must_use]
pub fn ccf_percent(compression_ms: u64, total_ms: u64) -> Option<u8> {
    if total_ms == 0 {
        return None;
    }
    let compression = u128::from(compression_ms.min(total_ms));
    let total = u128::from(total_ms);
    let pct = (compression * 200 + total) / (total * 2);
    u8::try_from(pct).ok()
}

/// The pause with the greatest duration; ties go to the earliest start.
#[must_use]
pub fn longest_pause<'a, I>(pauses: I) -> Option<&'a PauseEvent>
where
    I: IntoIterator<Item = &'a PauseEvent>,
{
    pauses.into_iter().fold(None, |best: Option<&PauseEvent>, p| match best {
        Some(b)
            if b.duration_ms > p.duration_ms
                || (b.duration_ms == p.duration_ms && b.started_at <= p.started_at) =>
        {
            Some(b)
        }
        _ => Some(p),
    })
}

/// Group pauses by reason.
///
/// A pause with several reasons contributes its full duration to each of
/// them. Pauses without reasons contribute to nothing. Sorted by total
/// duration descending, then by reason.
#[must_use]
pub fn pauses_by_reason<'a, I>(pauses: I) -> Vec<ReasonTotal>
where
    I: IntoIterator<Item = &'a PauseEvent>,
{
    let mut buckets: BTreeMap<PauseReason, (u64, u32)> = BTreeMap::new();

    for pause in pauses {
        for reason in &pause.reasons {
            let entry = buckets.entry(reason.clone()).or_insert((0, 0));
            entry.0 = entry.0.saturating_add(pause.duration_ms);
            entry.1 += 1;
        }
    }

    let mut totals: Vec<ReasonTotal> = buckets
        .into_iter()
        .map(|(reason, (total_ms, count))| ReasonTotal {
            reason,
            total_ms,
            count,
        })
        .collect();
    totals.sort_by(|a, b| b.total_ms.cmp(&a.total_ms).then_with(|| a.reason.cmp(&b.reason)));
    totals
}
