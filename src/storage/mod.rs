//! Storage layer for ccf.
//!
//! This module provides SQLite-based persistence for finished training
//! sessions and their pause logs.

mod database;
mod migrations;

pub use database::Database;
