//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::CcfError;

/// Action to take after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Start or resume compressions.
    CompressionsOn,
    /// Take hands off the chest.
    Pause,
    /// Toggle the reason at this index of the vocabulary.
    ToggleReason(usize),
    /// Remove every reason from the current pause.
    ClearReasons,
    /// Toggle the advanced airway.
    ToggleAirway,
    /// Acknowledge the pulse check.
    AcknowledgePulse,
    /// End and save the session.
    End,
    /// Discard the session.
    Reset,
    /// Show or hide help.
    Help,
}

/// Key bindings shown in the help panel.
pub const HELP: &[(&str, &str)] = &[
    ("space / c", "compressions on (start / resume)"),
    ("p", "pause (hands off)"),
    ("1-9", "toggle pause reason"),
    ("x", "clear pause reasons"),
    ("a", "toggle advanced airway"),
    ("k", "acknowledge pulse check"),
    ("e", "end and save session"),
    ("r", "reset"),
    ("?", "help"),
    ("q / Esc", "quit"),
];

/// Map a key press to an action.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    // Handle Ctrl+C
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(' ' | 'c') => Some(Action::CompressionsOn),
        KeyCode::Char('p') => Some(Action::Pause),
        KeyCode::Char(d @ '1'..='9') => d
            .to_digit(10)
            .and_then(|n| usize::try_from(n).ok())
            .map(|n| Action::ToggleReason(n - 1)),
        KeyCode::Char('x') => Some(Action::ClearReasons),
        KeyCode::Char('a') => Some(Action::ToggleAirway),
        KeyCode::Char('k') => Some(Action::AcknowledgePulse),
        KeyCode::Char('e') => Some(Action::End),
        KeyCode::Char('r') => Some(Action::Reset),
        KeyCode::Char('?') => Some(Action::Help),
        _ => None,
    }
}

/// Wait up to `timeout` for a key press.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn poll_action(timeout: Duration) -> Result<Option<Action>, CcfError> {
    if event::poll(timeout).map_err(|e| CcfError::Terminal(format!("Event poll failed: {e}")))? {
        if let Event::Key(key) =
            event::read().map_err(|e| CcfError::Terminal(format!("Event read failed: {e}")))?
        {
            return Ok(map_key(key));
        }
    }

    Ok(None)
}
