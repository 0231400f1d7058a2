//! Terminal presentation for the Tomato Clock.
//!
//! Subscribes to engine events and renders an in-place progress line, phase
//! transition messages, and a final summary. Also provides a JSON event
//! stream mode for machine consumers.

use std::io::Write;
use std::sync::Arc;

use colored::Colorize;
use serde::Serialize;

use crate::engine::{PomodoroTimer, TimerEvent};
use crate::types::{Phase, TimerState};

/// Width of the rendered progress bar, in characters.
const BAR_WIDTH: usize = 30;

/// Characters overwritten when clearing the progress line.
const CLEAR_WIDTH: usize = 80;

// ============================================================================
// Formatting helpers
// ============================================================================

/// Formats a second count as `MM:SS`.
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Renders a progress bar of the given width for a progress in `[0, 1]`.
pub fn progress_bar(progress: f64, width: usize, ascii: bool, color: bool) -> String {
    if width == 0 {
        return String::new();
    }
    let filled = ((width as f64) * progress.clamp(0.0, 1.0)).round() as usize;
    let filled = filled.min(width);

    let (fill_char, empty_char) = if ascii { ("#", "-") } else { ("█", "░") };
    let fill = fill_char.repeat(filled);
    let empty = empty_char.repeat(width - filled);

    if color && !ascii {
        format!("{}{}", fill.blue(), empty.dimmed())
    } else {
        format!("{}{}", fill, empty)
    }
}

// ============================================================================
// TerminalUi
// ============================================================================

/// Progress-bar front-end for a [`PomodoroTimer`].
///
/// Purely a consumer of the event interface: it never touches engine state
/// beyond the snapshots handed to its callbacks.
#[derive(Debug)]
pub struct TerminalUi {
    ascii: bool,
    color: bool,
}

impl TerminalUi {
    /// Creates a terminal UI with the given rendering options.
    pub fn new(ascii: bool, color: bool) -> Self {
        Self { ascii, color }
    }

    /// Registers this UI's callbacks on the timer.
    pub fn attach(self, timer: &mut PomodoroTimer) {
        let ui = Arc::new(self);

        let handle = Arc::clone(&ui);
        timer.add_callback(TimerEvent::PhaseStart, move |state| {
            handle.on_phase_start(state);
        });

        let handle = Arc::clone(&ui);
        timer.add_callback(TimerEvent::Tick, move |state| {
            handle.render_progress(state);
        });

        timer.add_callback(TimerEvent::PreRestWarning, |state| {
            tracing::info!(
                remaining = state.remaining_seconds,
                "rest ending soon"
            );
        });

        let handle = Arc::clone(&ui);
        timer.add_callback(TimerEvent::PhaseEnd, move |state| {
            handle.on_phase_end(state);
        });

        let handle = ui;
        timer.add_callback(TimerEvent::TimerComplete, move |state| {
            handle.on_complete(state);
        });
    }

    fn on_phase_start(&self, state: &TimerState) {
        tracing::info!(
            phase = state.phase.as_str(),
            cycle = state.cycle,
            total_seconds = state.total_seconds,
            "phase started"
        );
    }

    fn render_progress(&self, state: &TimerState) {
        let label = self.phase_label(state.phase);
        let bar = progress_bar(state.progress(), BAR_WIDTH, self.ascii, self.color);
        let line = format!(
            "Cycle {} {} | {} left | {} {:5.1}%",
            state.cycle,
            label,
            format_time(state.remaining_seconds),
            bar,
            state.progress() * 100.0
        );

        let mut out = std::io::stdout();
        let _ = write!(out, "\r{}", line);
        let _ = out.flush();
    }

    fn on_phase_end(&self, state: &TimerState) {
        self.clear_progress_line();
        let message = match state.phase {
            Phase::Work => format!("Cycle {}: work done, take a rest!", state.cycle),
            Phase::Rest => format!("Cycle {}: rest over, back to work!", state.cycle),
        };
        println!("{}", message);
    }

    fn on_complete(&self, _state: &TimerState) {
        self.clear_progress_line();
        println!("Pomodoro session complete.");
    }

    fn clear_progress_line(&self) {
        let mut out = std::io::stdout();
        let _ = write!(out, "\r{}\r", " ".repeat(CLEAR_WIDTH));
        let _ = out.flush();
    }

    fn phase_label(&self, phase: Phase) -> String {
        if !self.color {
            return phase.label().to_string();
        }
        match phase {
            Phase::Work => phase.label().yellow().bold().to_string(),
            Phase::Rest => phase.label().green().bold().to_string(),
        }
    }
}

// ============================================================================
// JSON event stream
// ============================================================================

/// One line of the `--json` output stream.
#[derive(Debug, Serialize)]
struct EventRecord<'a> {
    event: &'a str,
    phase: &'a str,
    cycle: u32,
    total_seconds: u32,
    remaining_seconds: u32,
    progress: f64,
}

/// Registers callbacks that print every engine event as a JSON line.
pub fn attach_json(timer: &mut PomodoroTimer) {
    for event in TimerEvent::ALL {
        timer.add_callback(event, move |state| {
            let record = EventRecord {
                event: event.as_str(),
                phase: state.phase.as_str(),
                cycle: state.cycle,
                total_seconds: state.total_seconds,
                remaining_seconds: state.remaining_seconds,
                progress: state.progress(),
            };
            match serde_json::to_string(&record) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::warn!(error = %e, "failed to serialize event"),
            }
        });
    }
}

// ============================================================================
// Tests
// ============================================================================
