//! Feature implementations for ccf.
//!
//! - Training cues (breaths, pulse checks, long pauses, timeline)
//! - Saved sessions and reports
//! - Scripted replay
//! - Shell completions

pub mod cues;
pub mod replay;
pub mod sessions;
pub mod shell;
