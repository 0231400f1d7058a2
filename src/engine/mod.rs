//! Timer engine for the Tomato Clock.
//!
//! This module contains the phase-cycling core:
//! - `dispatcher`: typed lifecycle events and the callback registry
//! - `timer`: the cycle controller and its thread-safe control surface

pub mod dispatcher;
pub mod timer;

pub use dispatcher::{Callback, EventDispatcher, TimerEvent};
pub use timer::{PomodoroTimer, TimerControl};
