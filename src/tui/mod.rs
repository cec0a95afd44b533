//! Terminal User Interface (TUI) for ccf.
//!
//! Runs the session timer live. Each frame measures the wall clock delta,
//! ticks the timer, checks cues and redraws. Built with ratatui and
//! crossterm.

mod app;
mod event;
mod ui;

pub use app::App;
pub use event::{map_key, Action};

use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::info;

use crate::config::Config;
use crate::core::SessionSink;
use crate::error::CcfError;

/// Run the TUI application.
///
/// # Errors
///
/// Returns an error if the TUI fails to initialize or run.
pub fn run<S: SessionSink>(config: &Config, sink: S) -> Result<(), CcfError> {
    enable_raw_mode()
        .map_err(|e| CcfError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| CcfError::Terminal(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| CcfError::Terminal(format!("Failed to create terminal: {e}")))?;

    let mut app = App::new(config, sink);
    let frame = Duration::from_millis(config.timer.frame_millis.clamp(10, 1000));
    info!(frame_ms = frame.as_millis(), "tui started");
    let result = run_app(&mut terminal, &mut app, frame);

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

/// Whole milliseconds since `last`, moving `last` forward by that much so the
/// remainder carries into the next measurement.
fn take_delta_ms(last: &mut Instant) -> u64 {
    let delta_ms = u64::try_from(last.elapsed().as_millis()).unwrap_or(u64::MAX);
    *last += Duration::from_millis(delta_ms);
    delta_ms
}

/// Run the main application loop.
fn run_app<B: Backend, S: SessionSink>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
    frame: Duration,
) -> Result<(), CcfError> {
    let mut last = Instant::now();

    loop {
        app.advance(take_delta_ms(&mut last));

        terminal
            .draw(|f| ui::render(f, app))
            .map_err(|e| CcfError::Terminal(format!("Failed to draw: {e}")))?;

        match event::poll_action(frame)? {
            Some(Action::Quit) => break,
            Some(action) => app.apply_after(take_delta_ms(&mut last), action),
            None => {}
        }
    }

    info!("tui stopped");
    Ok(())
}
