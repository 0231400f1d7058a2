//! Command-line definitions for the Tomato Clock.
//!
//! Uses clap derive macro for argument parsing. Durations are accepted in
//! minutes and may be fractional; range checks happen in
//! [`TimerConfig::validate`] so the engine fails fast on bad values.

use clap::Parser;

use crate::types::TimerConfig;

// ============================================================================
// CLI Structure
// ============================================================================

/// Terminal Pomodoro timer
#[derive(Parser, Debug)]
#[command(
    name = "tomato",
    version,
    about = "Terminal Pomodoro timer",
    long_about = "Alternates work and rest intervals in your terminal, with an \
                  optional cycle limit, desktop-free notifications and a live \
                  progress bar."
)]
pub struct Cli {
    /// Work duration in minutes (fractional values allowed)
    #[arg(short, long, default_value_t = 25.0)]
    pub work: f64,

    /// Rest duration in minutes (fractional values allowed)
    #[arg(short, long, default_value_t = 5.0)]
    pub rest: f64,

    /// Number of cycles to run before finishing (unbounded if omitted)
    #[arg(short, long)]
    pub cycles: Option<u32>,

    /// Seconds between display refreshes (values below 0.05 are clamped)
    #[arg(long, default_value_t = 1.0)]
    pub tick: f64,

    /// Seconds before a rest ends at which to warn
    #[arg(long = "pre-rest", default_value_t = 30)]
    pub pre_rest: u32,

    /// Use an ASCII progress bar instead of block glyphs
    #[arg(long)]
    pub ascii: bool,

    /// Colorize the progress bar and phase labels
    #[arg(long)]
    pub color: bool,

    /// Print a notification line at phase transitions
    #[arg(long)]
    pub notify: bool,

    /// Ring the terminal bell at phase transitions
    #[arg(long)]
    pub beep: bool,

    /// Emit events as JSON lines instead of the progress display
    #[arg(long)]
    pub json: bool,

    /// Generate a shell completion script and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Builds the engine configuration from the parsed arguments.
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig {
            work_minutes: self.work,
            rest_minutes: self.rest,
            cycles: self.cycles,
            tick: self.tick,
            pre_rest_warning: self.pre_rest,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
