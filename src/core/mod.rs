//! The CCF timer core.
//!
//! Everything in here is synchronous, allocation-light and free of I/O:
//! the session state machine, pause reasons, derived metrics and the
//! session record handed to persistence.

pub mod metrics;
pub mod reasons;
pub mod record;
pub mod timer;
pub mod traits;

pub use metrics::{ccf_percent, ReasonTotal};
pub use reasons::{parse_reason_list, PauseReason, ReasonSet, DEFAULT_REASONS};
pub use record::{ActivePause, PauseEvent, SessionRecord, TimerSnapshot};
pub use timer::{Event, InvalidTransition, Mode, SessionTimer};
pub use traits::SessionSink;

#[cfg(test)]
pub use traits::MockSessionSink;
