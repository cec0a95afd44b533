//! ccf-timer - a chest compression fraction timer for CPR training
//!
//! The timer core (`core`) tracks compressions versus hands-off time and the
//! reasons for each pause. Around it sit the training cues, a SQLite session
//! history, scripted replay, a ratatui front end and the `ccf` CLI.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod logging;
pub mod output;
pub mod storage;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use crate::core::{Mode, SessionRecord, SessionTimer};
pub use error::CcfError;
