//! Event dispatch for the timer engine.
//!
//! Decouples the cycle loop from any presentation layer. Consumers register
//! callbacks against a typed [`TimerEvent`]; the engine invokes them with a
//! read-only snapshot of the current timer state.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::types::TimerState;

// ============================================================================
// TimerEvent
// ============================================================================

/// Lifecycle events fired by the timer engine.
///
/// Per phase-run the engine guarantees the order: `PhaseStart`, zero or more
/// `Tick`s, at most one `PreRestWarning` (rest phases only), then `PhaseEnd`
/// unless the run was cut short by a stop. `TimerComplete` fires last and
/// exactly once per engine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerEvent {
    /// A work or rest phase-run has begun
    PhaseStart,
    /// Periodic refresh, rate-limited to the configured tick interval
    Tick,
    /// A rest phase is about to end (fires once per rest phase-run)
    PreRestWarning,
    /// A phase-run completed normally
    PhaseEnd,
    /// The whole timer run is over; always the final event
    TimerComplete,
}

impl TimerEvent {
    /// All event variants, in lifecycle order.
    pub const ALL: [TimerEvent; 5] = [
        TimerEvent::PhaseStart,
        TimerEvent::Tick,
        TimerEvent::PreRestWarning,
        TimerEvent::PhaseEnd,
        TimerEvent::TimerComplete,
    ];

    /// Returns the string representation of the event.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerEvent::PhaseStart => "phase_start",
            TimerEvent::Tick => "tick",
            TimerEvent::PreRestWarning => "pre_rest_warning",
            TimerEvent::PhaseEnd => "phase_end",
            TimerEvent::TimerComplete => "timer_complete",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

// ============================================================================
// EventDispatcher
// ============================================================================

/// A timer event callback. Receives a snapshot of the state at dispatch time;
/// the snapshot is a copy, so mutating it has no effect on the engine.
pub type Callback = Box<dyn Fn(&TimerState) + Send>;

/// Registry of callbacks per event variant.
///
/// Callbacks run in registration order. A panicking callback is caught and
/// logged so it cannot take down the timer loop or block later subscribers.
#[derive(Default)]
pub struct EventDispatcher {
    subscribers: [Vec<Callback>; 5],
}

impl EventDispatcher {
    /// Creates an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for the given event.
    pub fn subscribe<F>(&mut self, event: TimerEvent, callback: F)
    where
        F: Fn(&TimerState) + Send + 'static,
    {
        self.subscribers[event.index()].push(Box::new(callback));
    }

    /// Returns how many callbacks are registered for the given event.
    pub fn subscriber_count(&self, event: TimerEvent) -> usize {
        self.subscribers[event.index()].len()
    }

    /// Invokes every callback registered for `event`, in registration order.
    pub fn dispatch(&self, event: TimerEvent, state: &TimerState) {
        for callback in &self.subscribers[event.index()] {
            if catch_unwind(AssertUnwindSafe(|| callback(state))).is_err() {
                tracing::error!(event = event.as_str(), "timer callback panicked");
            }
        }
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut entries = f.debug_struct("EventDispatcher");
        for event in TimerEvent::ALL {
            entries.field(event.as_str(), &self.subscriber_count(event));
        }
        entries.finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
