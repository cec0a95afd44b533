//! Saved sessions and reports over them.

pub mod report;
pub mod storage;

pub use report::{ReportPeriod, SessionReport};
pub use storage::{SessionStore, StoredSession};
