//! Error types for ccf-timer.

use thiserror::Error;

use crate::core::InvalidTransition;

/// Errors surfaced by commands, storage and the terminal UI.
#[derive(Debug, Error)]
pub enum CcfError {
    /// A timer event was applied in a mode that does not allow it.
    #[error(transparent)]
    Transition(#[from] InvalidTransition),

    /// Configuration or path resolution failed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The session database failed.
    #[error("Database error: {0}")]
    Database(String),

    /// A requested item does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A replay script could not be parsed or applied.
    #[error("Script error on line {line}: {message}")]
    Script { line: usize, message: String },

    /// User supplied input could not be used.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The terminal could not be set up or drawn.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// JSON serialization failed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Event, Mode};

    #[test]
    fn test_transition_error_is_transparent() {
        let err: CcfError = InvalidTransition {
            mode: Mode::Idle,
            event: Event::End,
        }
        .into();
        assert_eq!(err.to_string(), "cannot end while Idle");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CcfError::NotFound("Session 4".to_string()).to_string(),
            "Not found: Session 4"
        );
        assert_eq!(
            CcfError::Config("bad".to_string()).to_string(),
            "Configuration error: bad"
        );
    }
}
