//! UI rendering for the TUI.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::core::{Mode, SessionSink};
use crate::features::cues::{timeline, CueAlert, SegmentKind};
use crate::output::{format_ccf, format_mmss};
use crate::tui::app::App;
use crate::tui::event::HELP;

/// Render the application UI.
pub fn render<S: SessionSink>(frame: &mut Frame<'_>, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(8), // Metrics
            Constraint::Length(3), // Cues
            Constraint::Length(3), // Timeline
            Constraint::Min(0),    // Reasons / summary / help
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_metrics(frame, app, chunks[1]);
    render_cues(frame, app, chunks[2]);
    render_timeline(frame, app, chunks[3]);

    if app.show_help {
        render_help(frame, chunks[4]);
    } else if app.timer.mode() == Mode::Ended {
        render_summary(frame, app, chunks[4]);
    } else {
        render_reasons(frame, app, chunks[4]);
    }

    render_status_bar(frame, app, chunks[5]);
}

const fn mode_color(mode: Mode) -> Color {
    match mode {
        Mode::Idle => Color::White,
        Mode::Compressing => Color::Green,
        Mode::Paused => Color::Red,
        Mode::Ended => Color::Blue,
    }
}

fn ccf_color(ccf: Option<u8>, target: u8) -> Color {
    match ccf {
        None => Color::DarkGray,
        Some(c) if c >= target => Color::Green,
        Some(c) if c.saturating_add(10) >= target => Color::Yellow,
        Some(_) => Color::Red,
    }
}

fn render_header<S: SessionSink>(frame: &mut Frame<'_>, app: &App<S>, area: Rect) {
    let mode = app.timer.mode();
    let title = Line::from(vec![
        Span::styled(
            " CCF Timer ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            format!(" {} ", mode.display_name().to_uppercase()),
            Style::default()
                .fg(Color::Black)
                .bg(mode_color(mode))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", app.cues.profile().patient()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(header, area);
}

fn metric(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<15}"), Style::default().fg(Color::DarkGray)),
        Span::raw(value),
    ])
}

fn render_metrics<S: SessionSink>(frame: &mut Frame<'_>, app: &App<S>, area: Rect) {
    let timer = &app.timer;
    let ccf = timer.ccf_percent();

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("{:<15}", "CCF"), Style::default().fg(Color::DarkGray)),
            Span::styled(
                format_ccf(ccf),
                Style::default()
                    .fg(ccf_color(ccf, app.target_ccf))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  (target {}%)", app.target_ccf),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        metric("Session", format_mmss(timer.elapsed_ms())),
        metric("Hands-off", format_mmss(timer.hands_off_ms())),
        metric("Pauses", timer.pause_count().to_string()),
        metric(
            "Longest pause",
            format_mmss(timer.longest_pause().map_or(0, |p| p.duration_ms)),
        ),
    ];

    if let Some(ms) = timer.current_pause_ms() {
        let style = if app.alert == Some(CueAlert::LongPause) {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Red)
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<15}", "Current pause"),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(format_mmss(ms), style),
        ]));
    }

    let metrics = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(metrics, area);
}

fn render_cues<S: SessionSink>(frame: &mut Frame<'_>, app: &App<S>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let status = app.cues.status(&app.timer);
    let profile = status.profile;

    if let Some(breath) = status.breath {
        let (label, color) = if breath.breaths_due {
            ("BREATHS DUE".to_string(), Color::Magenta)
        } else {
            (
                format!("{} in {}", profile.ratio_label(), format_mmss(breath.remaining_ms)),
                Color::Cyan,
            )
        };
        let title = if profile.advanced_airway() {
            " Breaths (airway) "
        } else {
            " Breaths "
        };
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(title))
            .gauge_style(Style::default().fg(color))
            .ratio(breath.progress.clamp(0.0, 1.0))
            .label(label);
        frame.render_widget(gauge, chunks[0]);
    }

    if let Some(cycle) = status.cycle {
        #[allow(clippy::cast_precision_loss)]
        let ratio = cycle.cycle_elapsed_ms as f64 / cycle.cycle_ms.max(1) as f64;
        let (label, color) = if cycle.pulse_check_due {
            ("PULSE CHECK (k)".to_string(), Color::Yellow)
        } else {
            (
                format!(
                    "{} / {}  cycle {}",
                    format_mmss(cycle.cycle_elapsed_ms),
                    format_mmss(cycle.cycle_ms),
                    cycle.completed_cycles + 1
                ),
                Color::Blue,
            )
        };
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(" Cycle "))
            .gauge_style(Style::default().fg(color))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(label);
        frame.render_widget(gauge, chunks[1]);
    }
}

fn render_timeline<S: SessionSink>(frame: &mut Frame<'_>, app: &App<S>, area: Rect) {
    let segments = timeline::from_timer(&app.timer);
    let width = area.width.saturating_sub(2);

    let spans: Vec<Span<'_>> = timeline::proportional_widths(&segments, width)
        .into_iter()
        .map(|(kind, cells)| {
            let color = match kind {
                SegmentKind::Compressions => Color::Green,
                SegmentKind::HandsOff => Color::Red,
            };
            Span::styled(" ".repeat(usize::from(cells)), Style::default().bg(color))
        })
        .collect();

    let strip = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Timeline "));
    frame.render_widget(strip, area);
}

fn render_reasons<S: SessionSink>(frame: &mut Frame<'_>, app: &App<S>, area: Rect) {
    let selected = app.timer.current_pause_reasons();
    let active = app.picker_visible();

    let lines: Vec<Line<'_>> = app
        .reasons
        .iter()
        .take(9)
        .enumerate()
        .map(|(i, reason)| {
            let on = selected.is_some_and(|set| set.contains(reason));
            let mark = if on { "[x]" } else { "[ ]" };
            let style = if on {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if active {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(Span::styled(format!(" {} {mark} {reason}", i + 1), style))
        })
        .collect();

    let title = if active {
        " Pause reasons (1-9 toggle, x clear) "
    } else {
        " Pause reasons "
    };
    let reasons = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(reasons, area);
}

fn render_summary<S: SessionSink>(frame: &mut Frame<'_>, app: &App<S>, area: Rect) {
    let Some(record) = app.timer.record() else {
        return;
    };

    let mut lines = vec![
        metric("Final CCF", format_ccf(record.ccf_percent)),
        metric("Total", format_mmss(record.total_ms)),
        metric("Compressions", format_mmss(record.compression_ms)),
        metric("Hands-off", format_mmss(record.hands_off_ms)),
        Line::raw(""),
    ];
    for total in record.pauses_by_reason() {
        lines.push(metric(
            total.reason.as_str(),
            format!("{}  ({}x)", format_mmss(total.total_ms), total.count),
        ));
    }

    let title = app
        .saved_id
        .map_or_else(|| " Summary (not saved) ".to_string(), |id| format!(" Session #{id} "));
    let summary = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(summary, area);
}

fn render_help(frame: &mut Frame<'_>, area: Rect) {
    let lines: Vec<Line<'_>> = HELP
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!(" {keys:<12}"), Style::default().fg(Color::Cyan)),
                Span::raw(*what),
            ])
        })
        .collect();

    let help = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Keys "));
    frame.render_widget(help, area);
}

fn render_status_bar<S: SessionSink>(frame: &mut Frame<'_>, app: &App<S>, area: Rect) {
    let status_text = app
        .status
        .as_deref()
        .unwrap_or("space:compress | p:pause | 1-9:reason | e:end | r:reset | ?:help | q:quit");

    let style = match app.alert {
        Some(CueAlert::LongPause) => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        Some(_) => Style::default().fg(Color::Yellow),
        None => Style::default().fg(Color::DarkGray),
    };

    frame.render_widget(Paragraph::new(status_text).style(style), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::SessionRecord;
    use crate::tui::event::Action;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &App<Vec<SessionRecord>>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_render_idle() {
        let app = App::new(&Config::default(), Vec::new());
        let screen = draw(&app);
        assert!(screen.contains("CCF Timer"));
        assert!(screen.contains("IDLE"));
        assert!(screen.contains("—%"));
    }

    #[test]
    fn test_render_paused_with_reasons() {
        let mut app = App::new(&Config::default(), Vec::new());
        app.apply(Action::CompressionsOn);
        app.advance(20_000);
        app.apply(Action::Pause);
        app.apply(Action::ToggleReason(1));
        app.advance(5_000);

        let screen = draw(&app);
        assert!(screen.contains("PAUSED"));
        assert!(screen.contains("[x] Shock"));
        assert!(screen.contains("Current pause"));
    }

    #[test]
    fn test_render_summary_after_end() {
        let mut app = App::new(&Config::default(), Vec::new());
        app.apply(Action::CompressionsOn);
        app.advance(30_000);
        app.apply(Action::End);

        let screen = draw(&app);
        assert!(screen.contains("Session #1"));
        assert!(screen.contains("Final CCF"));
    }
}
