//! Core data types for the Tomato Clock.
//!
//! This module defines the data structures used for:
//! - Timer configuration with validation
//! - Per-phase timer state and its timing arithmetic

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Floor applied to the configured tick interval, in seconds.
pub const MIN_TICK_SECONDS: f64 = 0.05;

// ============================================================================
// Phase
// ============================================================================

/// The two alternating phases of a Pomodoro cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Focused work interval
    Work,
    /// Rest interval between work sessions
    Rest,
}

impl Phase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::Rest => "rest",
        }
    }

    /// Returns the human-readable label used in terminal output.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Work => "Work",
            Phase::Rest => "Rest",
        }
    }
}

// ============================================================================
// ConfigError
// ============================================================================

/// Errors raised by [`TimerConfig::validate`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Work duration must be a positive number of minutes.
    #[error("work duration must be positive, got {0} minutes")]
    NonPositiveWork(f64),

    /// Rest duration must be a positive number of minutes.
    #[error("rest duration must be positive, got {0} minutes")]
    NonPositiveRest(f64),

    /// A configured cycle limit of zero would never run a phase.
    #[error("cycle count must be at least 1")]
    ZeroCycles,

    /// The tick interval has to be a real number to clamp against.
    #[error("tick interval must be a finite number, got {0}")]
    NonFiniteTick(f64),
}

// ============================================================================
// TimerConfig
// ============================================================================

/// Configuration for the Pomodoro timer.
///
/// Consumed read-only by the engine; durations are given in minutes and may be
/// fractional (handy for demos and tests).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Work duration in minutes (must be > 0)
    pub work_minutes: f64,
    /// Rest duration in minutes (must be > 0)
    pub rest_minutes: f64,
    /// Number of cycles to run; `None` means run until stopped
    pub cycles: Option<u32>,
    /// Seconds between tick events (clamped up to [`MIN_TICK_SECONDS`])
    pub tick: f64,
    /// Seconds before a rest phase ends at which the warning event fires
    pub pre_rest_warning: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_minutes: 25.0,
            rest_minutes: 5.0,
            cycles: None,
            tick: 1.0,
            pre_rest_warning: 30,
        }
    }
}

impl TimerConfig {
    /// Validates the configuration.
    ///
    /// Called by the engine at construction, before any phase-run starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.work_minutes > 0.0) {
            return Err(ConfigError::NonPositiveWork(self.work_minutes));
        }
        if !(self.rest_minutes > 0.0) {
            return Err(ConfigError::NonPositiveRest(self.rest_minutes));
        }
        if self.cycles == Some(0) {
            return Err(ConfigError::ZeroCycles);
        }
        if !self.tick.is_finite() {
            return Err(ConfigError::NonFiniteTick(self.tick));
        }
        Ok(())
    }

    /// Returns the configured duration of the given phase in whole seconds.
    pub fn phase_seconds(&self, phase: Phase) -> u32 {
        let minutes = match phase {
            Phase::Work => self.work_minutes,
            Phase::Rest => self.rest_minutes,
        };
        (minutes * 60.0).round() as u32
    }

    /// Returns the tick interval with the minimum floor applied.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(self.tick.max(MIN_TICK_SECONDS))
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// The mutable snapshot of a single phase-run.
///
/// A fresh `TimerState` is constructed at the start of every work or rest
/// phase-run and discarded when the next one begins. All timing arithmetic
/// lives here; the cycle loop only decides when to call it.
#[derive(Debug, Clone, Serialize)]
pub struct TimerState {
    /// Phase this run belongs to
    pub phase: Phase,
    /// 1-based cycle number, incremented after each completed rest phase
    pub cycle: u32,
    /// Configured duration of this phase-run, fixed at phase start
    pub total_seconds: u32,
    /// Seconds left, recomputed from elapsed wall-clock time
    pub remaining_seconds: u32,
    /// False once a stop has been requested; no further phase-runs start
    pub is_running: bool,
    /// While true, `remaining_seconds` is frozen
    pub is_paused: bool,
    /// Reference point for elapsed time; adjusted on resume to absorb pauses
    #[serde(skip_serializing)]
    start_time: Instant,
}

impl TimerState {
    /// Begins a new phase-run of the given duration.
    pub fn begin(phase: Phase, cycle: u32, total_seconds: u32, now: Instant) -> Self {
        Self {
            phase,
            cycle,
            total_seconds,
            remaining_seconds: total_seconds,
            is_running: true,
            is_paused: false,
            start_time: now,
        }
    }

    /// Recomputes `remaining_seconds` from the elapsed wall-clock time.
    ///
    /// Identity while paused. Remaining time never increases within a
    /// phase-run, so a skip observed between polls stays at zero.
    pub fn poll(&mut self, now: Instant) {
        if self.is_paused {
            return;
        }
        let elapsed = now.saturating_duration_since(self.start_time).as_secs();
        let computed = self
            .total_seconds
            .saturating_sub(elapsed.min(u64::from(u32::MAX)) as u32);
        self.remaining_seconds = self.remaining_seconds.min(computed);
    }

    /// Freezes `remaining_seconds` at its current value.
    pub fn pause(&mut self) {
        self.is_paused = true;
    }

    /// Resumes the countdown without leaking paused wall-clock time.
    ///
    /// Rewinds `start_time` so the elapsed time seen by the next poll equals
    /// the elapsed time accrued before the pause.
    pub fn resume(&mut self, now: Instant) {
        if !self.is_paused {
            return;
        }
        let elapsed_before_pause = self.total_seconds - self.remaining_seconds;
        self.start_time = now - Duration::from_secs(u64::from(elapsed_before_pause));
        self.is_paused = false;
    }

    /// Forces the phase-run to complete on the next poll.
    pub fn skip(&mut self) {
        self.remaining_seconds = 0;
    }

    /// Requests a cooperative stop. Does not alter the remaining time.
    pub fn stop(&mut self) {
        self.is_running = false;
    }

    /// Progress through this phase-run, clamped to `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 1.0;
        }
        let elapsed = f64::from(self.total_seconds - self.remaining_seconds);
        (elapsed / f64::from(self.total_seconds)).clamp(0.0, 1.0)
    }

    /// Whole minutes remaining.
    pub fn minutes_remaining(&self) -> u32 {
        self.remaining_seconds / 60
    }

    /// Seconds remaining modulo one minute.
    pub fn seconds_remaining(&self) -> u32 {
        self.remaining_seconds % 60
    }
}

// ============================================================================
// Tests
// ============================================================================
