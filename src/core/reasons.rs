//! Pause reason tags.
//!
//! Reasons are opaque host-supplied strings. A [`PauseReason`] keeps the
//! first spelling it was given for display and compares on a canonical key
//! (whitespace collapsed, case folded), so a pause can never carry the same
//! reason twice in different spellings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reasons offered when no vocabulary is configured.
pub const DEFAULT_REASONS: [&str; 8] = [
    "Rhythm/Analysis",
    "Shock",
    "Airway/Ventilation",
    "Pulse Check",
    "IV/IO/Meds",
    "SGA/ETT",
    "Move/Transport",
    "Other",
];

/// Returned when a reason is blank after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("pause reason must not be empty")]
pub struct EmptyReason;

/// A single pause reason tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PauseReason {
    label: String,
    key: String,
}

impl PauseReason {
    /// Build a reason from raw text, or `None` if it is blank.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }

    /// The display spelling.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.label
    }

    /// The canonical comparison key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl FromStr for PauseReason {
    type Err = EmptyReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.split_whitespace().collect::<Vec<_>>().join(" ");
        if label.is_empty() {
            return Err(EmptyReason);
        }
        let key = label.to_lowercase();
        Ok(Self { label, key })
    }
}

impl TryFrom<String> for PauseReason {
    type Error = EmptyReason;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PauseReason> for String {
    fn from(reason: PauseReason) -> Self {
        reason.label
    }
}

impl PartialEq for PauseReason {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for PauseReason {}

impl std::hash::Hash for PauseReason {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for PauseReason {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PauseReason {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Display for PauseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Insertion-ordered set of reasons attached to one pause.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PauseReason>", into = "Vec<PauseReason>")]
pub struct ReasonSet(Vec<PauseReason>);

impl ReasonSet {
    /// Create an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a reason. Returns false if an equal reason was already present.
    pub fn insert(&mut self, reason: PauseReason) -> bool {
        if self.contains(&reason) {
            return false;
        }
        self.0.push(reason);
        true
    }

    /// Remove a reason. Returns false if it was not present.
    pub fn remove(&mut self, reason: &PauseReason) -> bool {
        let before = self.0.len();
        self.0.retain(|r| r != reason);
        self.0.len() != before
    }

    #[must_use]
    pub fn contains(&self, reason: &PauseReason) -> bool {
        self.0.iter().any(|r| r == reason)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PauseReason> {
        self.0.iter()
    }

    /// Reasons joined with ", ", or `None` when the set is empty.
    #[must_use]
    pub fn joined(&self) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        Some(
            self.0
                .iter()
                .map(PauseReason::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

impl FromIterator<PauseReason> for ReasonSet {
    fn from_iter<I: IntoIterator<Item = PauseReason>>(iter: I) -> Self {
        let mut set = Self::new();
        for reason in iter {
            set.insert(reason);
        }
        set
    }
}

impl From<Vec<PauseReason>> for ReasonSet {
    fn from(reasons: Vec<PauseReason>) -> Self {
        reasons.into_iter().collect()
    }
}

impl From<ReasonSet> for Vec<PauseReason> {
    fn from(set: ReasonSet) -> Self {
        set.0
    }
}

impl<'a> IntoIterator for &'a ReasonSet {
    type Item = &'a PauseReason;
    type IntoIter = std::slice::Iter<'a, PauseReason>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Parse a comma separated list of reasons, skipping blank entries.
#[must_use]
pub fn parse_reason_list(s: &str) -> Vec<PauseReason> {
    s.split(',').filter_map(PauseReason::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(s: &str) -> PauseReason {
        PauseReason::new(s).unwrap()
    }

    #[test]
    fn test_blank_reason_rejected() {
        assert!(PauseReason::new("").is_none());
        assert!(PauseReason::new("   \t ").is_none());
        assert_eq!("  ".parse::<PauseReason>(), Err(EmptyReason));
    }

    #[test]
    fn test_reason_canonical_form() {
        let r = reason("  Pulse   Check ");
        assert_eq!(r.as_str(), "Pulse Check");
        assert_eq!(r.key(), "pulse check");
        assert_eq!(r, reason("pulse check"));
        assert_ne!(r, reason("Shock"));
    }

    #[test]
    fn test_set_insert_is_idempotent() {
        let mut set = ReasonSet::new();
        assert!(set.insert(reason("Shock")));
        assert!(!set.insert(reason("SHOCK")));
        assert_eq!(set.len(), 1);
        // First spelling wins
        assert_eq!(set.iter().next().unwrap().as_str(), "Shock");
    }

    #[test]
    fn test_set_remove_is_idempotent() {
        let mut set: ReasonSet = [reason("Shock"), reason("Other")].into_iter().collect();
        assert!(set.remove(&reason("shock")));
        assert!(!set.remove(&reason("shock")));
        assert_eq!(set.joined().as_deref(), Some("Other"));
    }

    #[test]
    fn test_set_keeps_insertion_order() {
        let set: ReasonSet = ["Shock", "Airway/Ventilation", "shock", "Other"]
            .iter()
            .map(|s| reason(s))
            .collect();
        assert_eq!(
            set.joined().as_deref(),
            Some("Shock, Airway/Ventilation, Other")
        );
    }

    #[test]
    fn test_deserialize_drops_duplicates() {
        let set: ReasonSet = serde_json::from_str(r#"["Shock", "shock", " SHOCK ", "Other"]"#).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.joined().as_deref(), Some("Shock, Other"));
    }

    #[test]
    fn test_parse_reason_list() {
        let reasons = parse_reason_list("Shock, , Pulse Check,");
        assert_eq!(reasons, vec![reason("Shock"), reason("Pulse Check")]);
    }

    #[test]
    fn test_serde_as_plain_strings() {
        let set: ReasonSet = [reason("Shock"), reason("Other")].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["Shock","Other"]"#);

        let back: ReasonSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);

        assert!(serde_json::from_str::<ReasonSet>(r#"["  "]"#).is_err());
    }
}
