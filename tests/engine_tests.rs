//! Integration tests for the timer engine.
//!
//! These exercise the full cycle loop with real (short) durations: event
//! ordering, cycle accounting, control-surface behavior from another task,
//! and the pre-rest warning.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tomato_clock::{MockNotifier, Notifier, Phase, PomodoroTimer, TimerConfig, TimerEvent};

/// Recorded event: kind, phase, cycle, remaining seconds at dispatch.
type Recorded = (TimerEvent, Phase, u32, u32);

/// Builds a config with durations given in seconds for readability.
fn config_seconds(work: f64, rest: f64, cycles: Option<u32>, pre_rest: u32) -> TimerConfig {
    TimerConfig {
        work_minutes: work / 60.0,
        rest_minutes: rest / 60.0,
        cycles,
        tick: 0.1,
        pre_rest_warning: pre_rest,
    }
}

/// Registers recording callbacks for every event.
fn record_events(timer: &mut PomodoroTimer) -> Arc<Mutex<Vec<Recorded>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    for event in TimerEvent::ALL {
        let events_clone = Arc::clone(&events);
        timer.add_callback(event, move |state| {
            events_clone.lock().unwrap().push((
                event,
                state.phase,
                state.cycle,
                state.remaining_seconds,
            ));
        });
    }
    events
}

fn count_of(events: &[Recorded], kind: TimerEvent) -> usize {
    events.iter().filter(|(event, _, _, _)| *event == kind).count()
}

// ============================================================================
// Cycle accounting
// ============================================================================

#[tokio::test]
async fn test_cycle_accounting_three_cycles() {
    let mut timer = PomodoroTimer::new(config_seconds(1.0, 1.0, Some(3), 30), None).unwrap();
    let events = record_events(&mut timer);

    timer.start().await;

    let events = events.lock().unwrap();
    let work_starts = events
        .iter()
        .filter(|(e, p, _, _)| *e == TimerEvent::PhaseStart && *p == Phase::Work)
        .count();
    let rest_starts = events
        .iter()
        .filter(|(e, p, _, _)| *e == TimerEvent::PhaseStart && *p == Phase::Rest)
        .count();

    // No trailing rest after the final work phase.
    assert_eq!(work_starts, 3);
    assert_eq!(rest_starts, 2);
    assert_eq!(count_of(&events, TimerEvent::TimerComplete), 1);
    assert_eq!(
        events.last().map(|(e, _, _, _)| *e),
        Some(TimerEvent::TimerComplete)
    );
}

#[tokio::test]
async fn test_cycle_numbers_increment_per_completed_pair() {
    let mut timer = PomodoroTimer::new(config_seconds(1.0, 1.0, Some(2), 30), None).unwrap();
    let events = record_events(&mut timer);

    timer.start().await;

    let starts: Vec<(Phase, u32)> = events
        .lock()
        .unwrap()
        .iter()
        .filter(|(e, _, _, _)| *e == TimerEvent::PhaseStart)
        .map(|(_, p, c, _)| (*p, *c))
        .collect();
    assert_eq!(
        starts,
        vec![
            (Phase::Work, 1),
            (Phase::Rest, 1),
            (Phase::Work, 2),
        ]
    );
}

// ============================================================================
// Stop semantics
// ============================================================================

#[tokio::test]
async fn test_stop_mid_work_suppresses_phase_end() {
    // A 30-second work phase forces the polling path.
    let mut timer = PomodoroTimer::new(config_seconds(30.0, 30.0, None, 30), None).unwrap();
    let events = record_events(&mut timer);
    let control = timer.control();

    let handle = tokio::spawn(async move { timer.start().await });

    tokio::time::sleep(Duration::from_millis(500)).await;
    control.stop();

    // Cancellation latency is bounded by one polling sleep; give it a
    // generous margin.
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("timer did not stop promptly")
        .unwrap();

    let events = events.lock().unwrap();
    assert_eq!(count_of(&events, TimerEvent::PhaseEnd), 0);
    assert_eq!(count_of(&events, TimerEvent::TimerComplete), 1);
    assert!(!control.is_running());
}

#[tokio::test]
async fn test_stop_leaves_consistent_final_state() {
    let mut timer = PomodoroTimer::new(config_seconds(30.0, 30.0, None, 30), None).unwrap();
    let control = timer.control();

    let handle = tokio::spawn(async move { timer.start().await });
    tokio::time::sleep(Duration::from_millis(400)).await;
    control.stop();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .unwrap()
        .unwrap();

    let state = control.snapshot().expect("a phase-run had begun");
    assert!(!state.is_running);
    assert!(state.remaining_seconds <= state.total_seconds);
}

// ============================================================================
// Pause / resume / skip from another task
// ============================================================================

#[tokio::test]
async fn test_pause_freezes_remaining_time() {
    let mut timer = PomodoroTimer::new(config_seconds(30.0, 30.0, None, 30), None).unwrap();
    let control = timer.control();

    let handle = tokio::spawn(async move { timer.start().await });
    tokio::time::sleep(Duration::from_millis(1300)).await;

    control.pause();
    let frozen = control.snapshot().unwrap().remaining_seconds;

    tokio::time::sleep(Duration::from_millis(1500)).await;
    let still_frozen = control.snapshot().unwrap().remaining_seconds;
    assert_eq!(frozen, still_frozen);

    control.stop();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_pause_resume_round_trip() {
    let mut timer = PomodoroTimer::new(config_seconds(30.0, 30.0, None, 30), None).unwrap();
    let control = timer.control();

    let handle = tokio::spawn(async move { timer.start().await });
    tokio::time::sleep(Duration::from_millis(1200)).await;

    control.pause();
    let before = control.snapshot().unwrap().remaining_seconds;
    control.resume();
    tokio::time::sleep(Duration::from_millis(200)).await;
    let after = control.snapshot().unwrap().remaining_seconds;

    // Within one poll granularity of the frozen value.
    assert!(before - after <= 1, "before={} after={}", before, after);

    control.stop();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_skip_completes_phase_normally() {
    let mut timer = PomodoroTimer::new(config_seconds(60.0, 60.0, Some(1), 30), None).unwrap();
    let events = record_events(&mut timer);
    let control = timer.control();

    let handle = tokio::spawn(async move { timer.start().await });
    tokio::time::sleep(Duration::from_millis(300)).await;
    control.skip_phase();

    // Skip ends the phase on the next poll; with a single cycle the whole
    // run finishes right after.
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("skip did not complete the phase")
        .unwrap();

    let events = events.lock().unwrap();
    // Skipping is a normal completion, so PhaseEnd is not suppressed.
    assert_eq!(count_of(&events, TimerEvent::PhaseEnd), 1);
    assert_eq!(count_of(&events, TimerEvent::TimerComplete), 1);
}

// ============================================================================
// Pre-rest warning
// ============================================================================

#[tokio::test]
async fn test_pre_rest_warning_fires_once_during_rest() {
    let notifier = Arc::new(MockNotifier::new());
    let mut timer = PomodoroTimer::new(
        config_seconds(1.0, 4.0, Some(2), 2),
        Some(Arc::clone(&notifier) as Arc<dyn Notifier>),
    )
    .unwrap();
    let events = record_events(&mut timer);

    timer.start().await;

    let events = events.lock().unwrap();
    let warnings: Vec<&Recorded> = events
        .iter()
        .filter(|(e, _, _, _)| *e == TimerEvent::PreRestWarning)
        .collect();

    assert_eq!(warnings.len(), 1);
    let (_, phase, _, remaining) = warnings[0];
    assert_eq!(*phase, Phase::Rest);
    assert!(*remaining > 0 && *remaining <= 2, "remaining={}", remaining);

    assert!(notifier
        .messages()
        .iter()
        .any(|(_, message)| message.contains("Rest ending soon")));
}

#[tokio::test]
async fn test_no_warning_during_work_phases() {
    let mut timer = PomodoroTimer::new(config_seconds(4.0, 1.0, Some(1), 10), None).unwrap();
    let events = record_events(&mut timer);

    timer.start().await;

    // The warning threshold covers the whole work phase, but warnings are a
    // rest-phase concept only.
    assert_eq!(
        count_of(&events.lock().unwrap(), TimerEvent::PreRestWarning),
        0
    );
}

// ============================================================================
// Tick rate limiting
// ============================================================================

#[tokio::test]
async fn test_ticks_are_rate_limited() {
    let config = TimerConfig {
        work_minutes: 3.0 / 60.0,
        rest_minutes: 1.0 / 60.0,
        cycles: Some(1),
        tick: 1.0,
        pre_rest_warning: 30,
    };
    let mut timer = PomodoroTimer::new(config, None).unwrap();
    let events = record_events(&mut timer);

    timer.start().await;

    // A 3-second phase with a 1-second tick interval: roughly 3 ticks,
    // never the ~30 the polling granularity would allow.
    let ticks = count_of(&events.lock().unwrap(), TimerEvent::Tick);
    assert!((1..=4).contains(&ticks), "expected ~3 ticks, got {}", ticks);
}

#[tokio::test]
async fn test_tick_remaining_is_monotonic() {
    let mut timer = PomodoroTimer::new(config_seconds(3.0, 1.0, Some(1), 30), None).unwrap();
    let events = record_events(&mut timer);

    timer.start().await;

    let events = events.lock().unwrap();
    let remains: Vec<u32> = events
        .iter()
        .filter(|(e, _, _, _)| *e == TimerEvent::Tick)
        .map(|(_, _, _, r)| *r)
        .collect();
    assert!(remains.windows(2).all(|w| w[0] >= w[1]), "{:?}", remains);
}
