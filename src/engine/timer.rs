//! Timer engine for the Tomato Clock.
//!
//! This module provides the core timer functionality:
//! - The cycle loop driving alternating work and rest phase-runs
//! - A cloneable control surface (pause/resume/skip/stop) safe to call from
//!   other tasks or threads
//! - Lifecycle event dispatch and optional notifications

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::engine::{EventDispatcher, TimerEvent};
use crate::notify::Notifier;
use crate::types::{ConfigError, Phase, TimerConfig, TimerState};

/// Sleep increment of the polling loop. Kept small and independent of the
/// tick interval so stop/pause/skip requests are observed promptly.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Phase-runs at or below this many seconds sleep straight through instead of
/// entering the polling loop.
const SHORT_PHASE_SECONDS: u32 = 2;

/// Title used for all notifications raised by the engine.
const NOTIFY_TITLE: &str = "Tomato Clock";

// ============================================================================
// Shared state
// ============================================================================

/// State shared between the cycle loop and control handles.
///
/// `state` holds the current phase-run (none before the first one begins).
/// `running` is the instance-owned cancellation flag; once cleared, no
/// further phase-runs start.
#[derive(Debug)]
struct Shared {
    state: Mutex<Option<TimerState>>,
    running: AtomicBool,
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, Option<TimerState>> {
        // A poisoned lock only means a panicking callback died while holding
        // it; the state itself is still a plain value.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// ============================================================================
// TimerControl
// ============================================================================

/// Cloneable handle for controlling a running [`PomodoroTimer`].
///
/// All operations are safe to call from a different task or thread than the
/// one running the cycle loop. They take effect within one polling interval.
#[derive(Debug, Clone)]
pub struct TimerControl {
    shared: Arc<Shared>,
}

impl TimerControl {
    /// Freezes the countdown of the current phase-run.
    pub fn pause(&self) {
        if let Some(state) = self.shared.lock_state().as_mut() {
            state.pause();
        }
    }

    /// Resumes a paused countdown without losing any remaining time.
    pub fn resume(&self) {
        if let Some(state) = self.shared.lock_state().as_mut() {
            state.resume(Instant::now());
        }
    }

    /// Ends the current phase-run immediately and moves on to the next.
    pub fn skip_phase(&self) {
        if let Some(state) = self.shared.lock_state().as_mut() {
            state.skip();
        }
    }

    /// Requests a cooperative stop of the whole timer run.
    pub fn stop(&self) {
        self.shared.running.store(false, Ordering::SeqCst);
        if let Some(state) = self.shared.lock_state().as_mut() {
            state.stop();
        }
    }

    /// Returns a copy of the current phase-run state, if one has begun.
    pub fn snapshot(&self) -> Option<TimerState> {
        self.shared.lock_state().clone()
    }

    /// Returns false once a stop has been requested.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }
}

// ============================================================================
// PomodoroTimer
// ============================================================================

/// The cycle controller: sequences work and rest phase-runs, enforces the
/// configured cycle limit, and fires lifecycle events.
///
/// When a cycle limit is configured, the run terminates right after the final
/// work phase-run; the trailing rest is not executed.
pub struct PomodoroTimer {
    config: TimerConfig,
    dispatcher: EventDispatcher,
    notifier: Option<Arc<dyn Notifier>>,
    shared: Arc<Shared>,
}

impl PomodoroTimer {
    /// Creates a timer from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid; nothing
    /// runs and no event fires in that case.
    pub fn new(
        config: TimerConfig,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            dispatcher: EventDispatcher::new(),
            notifier,
            shared: Arc::new(Shared {
                state: Mutex::new(None),
                running: AtomicBool::new(true),
            }),
        })
    }

    /// Registers a callback for a timer event. Callbacks registered for the
    /// same event run in registration order.
    pub fn add_callback<F>(&mut self, event: TimerEvent, callback: F)
    where
        F: Fn(&TimerState) + Send + 'static,
    {
        self.dispatcher.subscribe(event, callback);
    }

    /// Returns a control handle usable from other tasks or threads.
    pub fn control(&self) -> TimerControl {
        TimerControl {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Returns the configuration the timer was built with.
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Runs the cycle loop until the cycle limit is exhausted or a stop is
    /// requested, then fires `TimerComplete` exactly once.
    ///
    /// Blocks the calling task for the whole run; presentation layers
    /// typically spawn it on a dedicated task and keep a [`TimerControl`].
    pub async fn start(&mut self) {
        let mut cycle: u32 = 1;

        loop {
            if !self.run_phase(Phase::Work, cycle).await {
                break;
            }
            if let Some(limit) = self.config.cycles {
                if cycle >= limit {
                    tracing::info!(cycles = limit, "cycle limit reached");
                    break;
                }
            }
            if !self.run_phase(Phase::Rest, cycle).await {
                break;
            }
            cycle += 1;
        }

        let final_state = self.final_snapshot(cycle);
        self.dispatcher
            .dispatch(TimerEvent::TimerComplete, &final_state);
    }

    /// Runs one phase-run to completion.
    ///
    /// Returns false when the run was ended by a stop request, in which case
    /// the cycle loop terminates without starting further phase-runs.
    async fn run_phase(&mut self, phase: Phase, cycle: u32) -> bool {
        if !self.shared.running.load(Ordering::SeqCst) {
            return false;
        }

        let total_seconds = self.config.phase_seconds(phase);
        let state = TimerState::begin(phase, cycle, total_seconds, Instant::now());
        *self.shared.lock_state() = Some(state.clone());

        tracing::debug!(
            phase = phase.as_str(),
            cycle,
            total_seconds,
            "phase started"
        );
        self.notify(&format!("Starting {}: cycle {}", phase.label(), cycle));
        self.dispatcher.dispatch(TimerEvent::PhaseStart, &state);

        if total_seconds <= SHORT_PHASE_SECONDS {
            return self.run_short_phase(total_seconds).await;
        }

        let tick_interval = self.config.tick_interval();
        let mut warned = false;
        let mut last_tick = Instant::now();

        loop {
            let snapshot = {
                let mut guard = self.shared.lock_state();
                let Some(state) = guard.as_mut() else {
                    return false;
                };
                if !self.shared.running.load(Ordering::SeqCst) {
                    state.stop();
                }
                state.poll(Instant::now());
                state.clone()
            };

            if !snapshot.is_running {
                // Cut short by a stop request: suppress PhaseEnd.
                return false;
            }
            if snapshot.remaining_seconds == 0 {
                break;
            }

            if phase == Phase::Rest
                && !warned
                && snapshot.remaining_seconds <= self.config.pre_rest_warning
            {
                warned = true;
                self.notify(&format!(
                    "Rest ending soon (~{}s left), get ready to work",
                    snapshot.remaining_seconds
                ));
                self.dispatcher
                    .dispatch(TimerEvent::PreRestWarning, &snapshot);
            }

            if last_tick.elapsed() >= tick_interval {
                last_tick = Instant::now();
                self.dispatcher.dispatch(TimerEvent::Tick, &snapshot);
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }

        self.finish_phase(phase, cycle);
        true
    }

    /// Degenerate path for very short phases: sleep the whole duration
    /// instead of polling.
    async fn run_short_phase(&mut self, total_seconds: u32) -> bool {
        tokio::time::sleep(Duration::from_secs(u64::from(total_seconds))).await;

        let snapshot = {
            let mut guard = self.shared.lock_state();
            let Some(state) = guard.as_mut() else {
                return false;
            };
            if !self.shared.running.load(Ordering::SeqCst) {
                state.stop();
            }
            state.skip();
            state.clone()
        };

        // The full duration elapsed, so the run completed even if a stop
        // arrived during the sleep; the stop only ends the cycle loop.
        self.finish_phase(snapshot.phase, snapshot.cycle);
        snapshot.is_running
    }

    fn finish_phase(&mut self, phase: Phase, cycle: u32) {
        let message = match phase {
            Phase::Work => format!("Work complete, time to rest: cycle {}", cycle),
            Phase::Rest => format!("Rest over, back to work: cycle {}", cycle),
        };
        tracing::debug!(phase = phase.as_str(), cycle, "phase complete");
        self.notify(&message);

        // Clone out of the lock so callbacks may call control operations
        // without deadlocking.
        let snapshot = self.shared.lock_state().clone();
        if let Some(state) = snapshot {
            self.dispatcher.dispatch(TimerEvent::PhaseEnd, &state);
        }
    }

    /// Snapshot used for the final `TimerComplete` event. Falls back to a
    /// synthetic stopped state if no phase-run ever began.
    fn final_snapshot(&self, cycle: u32) -> TimerState {
        self.shared.lock_state().clone().unwrap_or_else(|| {
            let mut state = TimerState::begin(Phase::Work, cycle, 0, Instant::now());
            state.stop();
            state
        })
    }

    fn notify(&self, message: &str) {
        if let Some(notifier) = &self.notifier {
            notifier.notify(NOTIFY_TITLE, message);
        }
    }
}

impl std::fmt::Debug for PomodoroTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PomodoroTimer")
            .field("config", &self.config)
            .field("dispatcher", &self.dispatcher)
            .field("has_notifier", &self.notifier.is_some())
            .field("shared", &self.shared)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
