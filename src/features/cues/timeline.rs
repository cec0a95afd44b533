//! Compression / hands-off timeline reconstructed from the pause log.

use serde::Serialize;

use crate::core::{Mode, PauseEvent, SessionRecord, SessionTimer};

/// What was happening during a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Compressions were being delivered.
    Compressions,
    /// Hands were off the chest.
    HandsOff,
}

/// A contiguous stretch of session time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub kind: SegmentKind,
    /// Offset from session start.
    pub start_ms: u64,
    pub duration_ms: u64,
}

/// Timeline of a live session, including the open pause.
#[must_use]
pub fn from_timer(timer: &SessionTimer) -> Vec<Segment> {
    if let Some(record) = timer.record() {
        return from_record(record);
    }

    let elapsed = timer.elapsed_ms();
    let open = timer
        .current_pause_ms()
        .map(|ms| (elapsed.saturating_sub(ms), ms));

    let mut segments = build(timer.pause_log(), open.map_or(elapsed, |(offset, _)| offset));
    if let Some((offset, ms)) = open {
        push(&mut segments, SegmentKind::HandsOff, offset, ms);
    }
    if timer.mode() == Mode::Idle {
        segments.clear();
    }
    segments
}

/// Timeline of a finished session.
#[must_use]
pub fn from_record(record: &SessionRecord) -> Vec<Segment> {
    build(&record.pause_log, record.total_ms)
}

/// Alternating segments for `pauses`, with compressions filling the gaps up
/// to `until_ms`.
fn build(pauses: &[PauseEvent], until_ms: u64) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(pauses.len() * 2 + 1);
    let mut cursor = 0;

    for pause in pauses {
        push(
            &mut segments,
            SegmentKind::Compressions,
            cursor,
            pause.offset_ms.saturating_sub(cursor),
        );
        push(
            &mut segments,
            SegmentKind::HandsOff,
            pause.offset_ms,
            pause.duration_ms,
        );
        cursor = pause.offset_ms.saturating_add(pause.duration_ms);
    }

    push(
        &mut segments,
        SegmentKind::Compressions,
        cursor,
        until_ms.saturating_sub(cursor),
    );
    segments
}

fn push(segments: &mut Vec<Segment>, kind: SegmentKind, start_ms: u64, duration_ms: u64) {
    if duration_ms > 0 {
        segments.push(Segment {
            kind,
            start_ms,
            duration_ms,
        });
    }
}

/// Split `width` cells between segments in proportion to their duration.
///
/// Every segment gets at least one cell while space remains.
#[must_use]
pub fn proportional_widths(segments: &[Segment], width: u16) -> Vec<(SegmentKind, u16)> {
    let total: u64 = segments.iter().map(|s| s.duration_ms).sum();
    if total == 0 || width == 0 {
        return Vec::new();
    }

    let mut used: u16 = 0;
    let mut acc: u64 = 0;
    let mut out = Vec::with_capacity(segments.len());
    for segment in segments {
        acc += segment.duration_ms;
        let edge = u16::try_from(acc * u64::from(width) / total).unwrap_or(width);
        let cells = edge.saturating_sub(used).max(1).min(width - used);
        if cells == 0 {
            break;
        }
        used += cells;
        out.push((segment.kind, cells));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PauseReason;

    #[test]
    fn test_idle_timeline_is_empty() {
        assert!(from_timer(&SessionTimer::new()).is_empty());
    }

    #[test]
    fn test_live_timeline_with_open_pause() {
        let mut timer = SessionTimer::new();
        timer.start().unwrap();
        timer.tick(10_000);
        timer.pause(PauseReason::new("Shock")).unwrap();
        timer.tick(3_000);
        timer.resume().unwrap();
        timer.tick(20_000);
        timer.pause(Vec::new()).unwrap();
        timer.tick(4_000);

        let segments = from_timer(&timer);
        let kinds: Vec<_> = segments.iter().map(|s| (s.kind, s.start_ms, s.duration_ms)).collect();
        assert_eq!(
            kinds,
            vec![
                (SegmentKind::Compressions, 0, 10_000),
                (SegmentKind::HandsOff, 10_000, 3_000),
                (SegmentKind::Compressions, 13_000, 20_000),
                (SegmentKind::HandsOff, 33_000, 4_000),
            ]
        );
    }

    #[test]
    fn test_record_timeline_covers_total() {
        let mut timer = SessionTimer::new();
        timer.start().unwrap();
        timer.tick(5_000);
        timer.pause(Vec::new()).unwrap();
        timer.tick(1_000);
        timer.resume().unwrap();
        timer.tick(2_000);
        let record = timer.end().unwrap();

        let segments = from_record(&record);
        let covered: u64 = segments.iter().map(|s| s.duration_ms).sum();
        assert_eq!(covered, record.total_ms);
        assert_eq!(segments.len(), 3);
        assert_eq!(from_timer(&timer), segments);
    }

    #[test]
    fn test_proportional_widths() {
        let segments = [
            Segment {
                kind: SegmentKind::Compressions,
                start_ms: 0,
                duration_ms: 75,
            },
            Segment {
                kind: SegmentKind::HandsOff,
                start_ms: 75,
                duration_ms: 25,
            },
        ];
        let widths = proportional_widths(&segments, 40);
        assert_eq!(
            widths,
            vec![(SegmentKind::Compressions, 30), (SegmentKind::HandsOff, 10)]
        );
        assert!(proportional_widths(&[], 40).is_empty());
    }
}
