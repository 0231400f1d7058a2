//! Tomato Clock Library
//!
//! This library provides the core functionality for the Tomato Clock CLI, a
//! Pomodoro-style interval timer. It includes:
//! - A phase-cycling timer engine with pause/resume/skip/stop control
//! - Typed lifecycle events with per-callback fault isolation
//! - A best-effort notification capability
//! - Terminal and JSON presentation front-ends built on the event interface

pub mod cli;
pub mod engine;
pub mod notify;
pub mod types;

// Re-export commonly used types for convenience
pub use engine::{EventDispatcher, PomodoroTimer, TimerControl, TimerEvent};
pub use notify::{ConsoleNotifier, MockNotifier, Notifier};
pub use types::{ConfigError, Phase, TimerConfig, TimerState, MIN_TICK_SECONDS};
