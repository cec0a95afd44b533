//! Configuration management for ccf.
//!
//! This module handles loading and saving configuration from `~/.ccf/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{ColorSetting, Config, CueConfig, GeneralConfig, StorageConfig, TimerConfig};
