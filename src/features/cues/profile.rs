//! CPR profile used to time breath cues.

use serde::{Deserialize, Serialize};

/// Lowest compression rate accepted, in compressions per minute.
pub const MIN_RATE_BPM: u32 = 60;
/// Highest compression rate accepted, in compressions per minute.
pub const MAX_RATE_BPM: u32 = 200;
/// Default compression rate.
pub const DEFAULT_RATE_BPM: u32 = 110;

/// Breath interval once an advanced airway is in place.
pub const ADVANCED_AIRWAY_INTERVAL_MS: u64 = 6_000;

/// Patient the scenario is run for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatientType {
    /// Adult patient.
    #[default]
    Adult,
    /// Child patient.
    Child,
    /// Infant patient.
    Infant,
}

impl PatientType {
    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Adult => "Adult",
            Self::Child => "Child",
            Self::Infant => "Infant",
        }
    }
}

impl std::fmt::Display for PatientType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Patient, rescuer count, compression rate and airway state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CprProfile {
    patient: PatientType,
    rescuers: u8,
    compression_rate_bpm: u32,
    advanced_airway: bool,
}

impl Default for CprProfile {
    fn default() -> Self {
        Self::new(PatientType::Adult, 1, DEFAULT_RATE_BPM)
    }
}

impl CprProfile {
    /// Create a profile, clamping rescuers to 1..=2 and the rate to
    /// 60..=200 BPM.
    #[must_use]
    pub fn new(patient: PatientType, rescuers: u8, compression_rate_bpm: u32) -> Self {
        Self {
            patient,
            rescuers: rescuers.clamp(1, 2),
            compression_rate_bpm: compression_rate_bpm.clamp(MIN_RATE_BPM, MAX_RATE_BPM),
            advanced_airway: false,
        }
    }

    #[must_use]
    pub const fn patient(&self) -> PatientType {
        self.patient
    }

    #[must_use]
    pub const fn rescuers(&self) -> u8 {
        self.rescuers
    }

    #[must_use]
    pub const fn compression_rate_bpm(&self) -> u32 {
        self.compression_rate_bpm
    }

    #[must_use]
    pub const fn advanced_airway(&self) -> bool {
        self.advanced_airway
    }

    /// Set whether an advanced airway is in place.
    pub fn set_advanced_airway(&mut self, enabled: bool) {
        self.advanced_airway = enabled;
    }

    /// Compressions delivered between breath pauses without an airway.
    ///
    /// 15:2 applies only to children and infants with two rescuers.
    #[must_use]
    pub fn compressions_per_block(&self) -> u32 {
        if self.rescuers >= 2 && self.patient != PatientType::Adult {
            15
        } else {
            30
        }
    }

    /// Compression time between breath cues.
    #[must_use]
    pub fn breath_interval_ms(&self) -> u64 {
        if self.advanced_airway {
            return ADVANCED_AIRWAY_INTERVAL_MS;
        }
        u64::from(self.compressions_per_block()) * 60_000 / u64::from(self.compression_rate_bpm)
    }

    /// Compression to breath ratio, e.g. `30:2`, or `q6s` with an airway.
    #[must_use]
    pub fn ratio_label(&self) -> String {
        if self.advanced_airway {
            "q6s".to_string()
        } else {
            format!("{}:2", self.compressions_per_block())
        }
    }
}
