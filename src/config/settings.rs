//! Configuration settings for ccf.
//!
//! Settings are loaded from `~/.ccf/config.yaml`. Every field has a default,
//! so a partial file (or none at all) is fine.

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::core::{PauseReason, ReasonSet, DEFAULT_REASONS};
use crate::error::CcfError;
use crate::features::cues::{CprProfile, PatientType};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Timer behaviour.
    pub timer: TimerConfig,
    /// Training cue settings.
    pub cues: CueConfig,
    /// Pause reasons offered by the terminal UI.
    pub reasons: Vec<String>,
    /// Session storage settings.
    pub storage: StorageConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Color output setting.
    #[serde(default = "default_color")]
    pub color: ColorSetting,
    /// Log level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

/// Timer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Terminal UI frame interval in milliseconds.
    #[serde(default = "default_frame_millis")]
    pub frame_millis: u64,
    /// Length of one CPR cycle (pulse check interval) in seconds.
    #[serde(default = "default_cycle_seconds")]
    pub cycle_seconds: u64,
    /// Warn when a single pause runs long.
    #[serde(default = "default_true")]
    pub long_pause_warning: bool,
    /// Pause length, in seconds, that triggers the warning.
    #[serde(default = "default_long_pause_seconds")]
    pub long_pause_warning_seconds: u64,
    /// Open the reason picker whenever a pause starts.
    #[serde(default = "default_true")]
    pub pause_reason_prompt: bool,
}

/// Training cue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CueConfig {
    /// Show the breath cue.
    #[serde(default = "default_true")]
    pub breath_cues: bool,
    /// Show the pulse check cue.
    #[serde(default = "default_true")]
    pub pulse_cues: bool,
    /// Patient the scenario is run for.
    #[serde(default)]
    pub patient: PatientType,
    /// Number of rescuers (1 or 2).
    #[serde(default = "default_rescuers")]
    pub rescuers: u8,
    /// Compression rate used to time breath cues.
    #[serde(default = "default_compression_rate")]
    pub compression_rate_bpm: u32,
}

/// Session storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Number of sessions kept; older ones are pruned.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u32,
    /// CCF considered a passing score in reports.
    #[serde(default = "default_target_ccf")]
    pub target_ccf_percent: u8,
}

// Default value functions for serde
const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_color() -> ColorSetting {
    ColorSetting::Auto
}

fn default_log_level() -> String {
    "warn".to_string()
}

const fn default_frame_millis() -> u64 {
    100
}

const fn default_cycle_seconds() -> u64 {
    120
}

const fn default_long_pause_seconds() -> u64 {
    10
}

const fn default_true() -> bool {
    true
}

const fn default_rescuers() -> u8 {
    1
}

const fn default_compression_rate() -> u32 {
    110
}

const fn default_max_sessions() -> u32 {
    200
}

const fn default_target_ccf() -> u8 {
    80
}

fn default_reasons() -> Vec<String> {
    DEFAULT_REASONS.iter().map(ToString::to_string).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            timer: TimerConfig::default(),
            cues: CueConfig::default(),
            reasons: default_reasons(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            color: default_color(),
            log_level: default_log_level(),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            frame_millis: default_frame_millis(),
            cycle_seconds: default_cycle_seconds(),
            long_pause_warning: default_true(),
            long_pause_warning_seconds: default_long_pause_seconds(),
            pause_reason_prompt: default_true(),
        }
    }
}

impl Default for CueConfig {
    fn default() -> Self {
        Self {
            breath_cues: default_true(),
            pulse_cues: default_true(),
            patient: PatientType::default(),
            rescuers: default_rescuers(),
            compression_rate_bpm: default_compression_rate(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            target_ccf_percent: default_target_ccf(),
        }
    }
}

impl CueConfig {
    /// The CPR profile described by these settings, with out of range
    /// values clamped.
    #[must_use]
    pub fn profile(&self) -> CprProfile {
        CprProfile::new(self.patient, self.rescuers, self.compression_rate_bpm)
    }
}

impl Config {
    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, CcfError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            CcfError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            CcfError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), CcfError> {
        let contents = self.to_yaml()?;

        std::fs::write(path, contents).map_err(|e| {
            CcfError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Serialize the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, CcfError> {
        serde_yaml::to_string(self)
            .map_err(|e| CcfError::Config(format!("Failed to serialize config: {e}")))
    }

    /// The configured reason vocabulary, canonicalised and deduplicated.
    ///
    /// Falls back to the built-in list when nothing usable is configured.
    #[must_use]
    pub fn reason_vocabulary(&self) -> Vec<PauseReason> {
        let set: ReasonSet = self
            .reasons
            .iter()
            .filter_map(|r| PauseReason::new(r))
            .collect();

        if set.is_empty() {
            return DEFAULT_REASONS
                .iter()
                .filter_map(|r| PauseReason::new(r))
                .collect();
        }
        set.iter().cloned().collect()
    }
}
