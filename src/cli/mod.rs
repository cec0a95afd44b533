//! Command-line interface for ccf.

pub mod args;
pub mod commands;
