//! Tests for the timer command surface
//!
//! These drive whole timers (commands, ticker task, beeper) on a paused
//! clock, so every countdown runs in simulated time.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::TryRecvError;
use tokio::task::yield_now;
use tokio::time;

use crate::audio::AlertFn;
use crate::config::TimerConfig;
use crate::error::ValidationError;
use crate::state::countdown::TimerStatus;
use crate::state::snapshot::TimerEvent;
use crate::state::timer::Timer;

fn counting_alert() -> (AlertFn, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let probe = Arc::clone(&count);
    let alert: AlertFn = Arc::new(move || {
        probe.fetch_add(1, Ordering::SeqCst);
    });
    (alert, count)
}

fn timer_with_counter(config: &TimerConfig) -> (Timer, Arc<AtomicUsize>) {
    let (alert, count) = counting_alert();
    (Timer::with_alert(config, alert), count)
}

/// Let spawned tasks run between clock manipulations.
async fn settle() {
    for _ in 0..8 {
        yield_now().await;
    }
}

/// Advance the clock by `n` tick periods, letting the ticker run each step.
async fn run_ticks(config: &TimerConfig, n: u32) {
    for _ in 0..n {
        time::advance(config.tick_period).await;
        settle().await;
    }
}

#[tokio::test(start_paused = true)]
async fn configure_commits_and_starts_running() {
    let config = TimerConfig::default();
    let (timer, _) = timer_with_counter(&config);

    timer.configure("Tea", "300").expect("valid input");

    let snapshot = timer.snapshot();
    assert_eq!(snapshot.status, TimerStatus::Running);
    assert_eq!(snapshot.remaining_secs, 300.0);
    assert_eq!(snapshot.configured_secs, 300.0);
    assert_eq!(snapshot.name, "Tea");
}

#[tokio::test(start_paused = true)]
async fn invalid_durations_leave_the_timer_untouched() {
    let config = TimerConfig::default();
    let (timer, _) = timer_with_counter(&config);

    for bad in ["", "abc", "0", "3601", "12.5"] {
        let before = timer.snapshot();
        let result = timer.configure("Tea", bad);
        assert!(result.is_err(), "{:?} should be rejected", bad);
        assert_eq!(timer.snapshot(), before);
    }
    assert_eq!(timer.status(), TimerStatus::Unconfigured);
}

#[tokio::test(start_paused = true)]
async fn invalid_reconfigure_preserves_a_running_countdown() {
    let config = TimerConfig::default();
    let (timer, _) = timer_with_counter(&config);
    timer.configure("Tea", "5").expect("valid input");

    let before = timer.snapshot();
    assert_eq!(
        timer.configure("Tea", "0"),
        Err(ValidationError::DurationOutOfRange)
    );
    assert_eq!(
        timer.configure(&"x".repeat(51), "5"),
        Err(ValidationError::NameLength)
    );
    assert_eq!(timer.snapshot(), before);
}

#[tokio::test(start_paused = true)]
async fn start_without_inputs_reports_a_validation_error() {
    let config = TimerConfig::default();
    let (timer, _) = timer_with_counter(&config);

    assert_eq!(timer.start(), Err(ValidationError::DurationNotANumber));
    assert_eq!(timer.status(), TimerStatus::Unconfigured);
}

#[tokio::test(start_paused = true)]
async fn start_commits_the_typed_inputs() {
    let config = TimerConfig::default();
    let (timer, _) = timer_with_counter(&config);

    timer.set_name("Tea");
    timer.set_duration("5");
    timer.start().expect("valid input");

    let snapshot = timer.snapshot();
    assert_eq!(snapshot.status, TimerStatus::Running);
    assert_eq!(snapshot.remaining_secs, 5.0);
    assert_eq!(snapshot.name, "Tea");
}

#[tokio::test(start_paused = true)]
async fn resume_skips_exactly_one_tick() {
    let config = TimerConfig::default();
    let (timer, _) = timer_with_counter(&config);
    timer.configure("Tea", "5").expect("valid input");

    // Guard tick, then one real decrement.
    run_ticks(&config, 2).await;
    let frozen = timer.remaining_secs();
    assert!(frozen < 5.0);

    timer.stop().await;
    assert_eq!(timer.status(), TimerStatus::Stopped);
    run_ticks(&config, 3).await;
    assert_eq!(timer.remaining_secs(), frozen);

    timer.start().expect("resume needs no input");
    // The ticker's immediate first tick is consumed by the resume guard.
    settle().await;
    assert_eq!(timer.remaining_secs(), frozen);
    assert_eq!(timer.status(), TimerStatus::Running);

    // The next tick decrements again.
    run_ticks(&config, 1).await;
    assert!(timer.remaining_secs() < frozen);
}

#[tokio::test(start_paused = true)]
async fn finished_tea_timer_end_to_end() {
    let config = TimerConfig::default();
    let (timer, _) = timer_with_counter(&config);
    let mut events = timer.events();

    timer.set_name("Tea");
    timer.set_duration("5");
    timer.start().expect("valid input");

    // Five seconds of 60 Hz ticks, plus the guard tick and headroom.
    run_ticks(&config, 320).await;

    let snapshot = timer.snapshot();
    assert_eq!(snapshot.status, TimerStatus::Finished);
    assert_eq!(snapshot.remaining_secs, 0.0);
    assert!(timer.alert_active());

    match events.try_recv() {
        Ok(TimerEvent::Finished { name, .. }) => assert_eq!(name, "Tea"),
        other => panic!("expected a finished notification, got {:?}", other),
    }
    // Exactly one notification per finish.
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn reset_silences_and_rearms() {
    let config = TimerConfig::default();
    let (timer, count) = timer_with_counter(&config);
    timer.configure("Tea", "1").expect("valid input");

    run_ticks(&config, 70).await;
    assert_eq!(timer.status(), TimerStatus::Finished);
    assert!(timer.alert_active());

    // Let a beep or two through, then reset.
    time::advance(Duration::from_secs(2)).await;
    settle().await;
    assert!(count.load(Ordering::SeqCst) > 0);

    timer.reset().await;
    let snapshot = timer.snapshot();
    assert_eq!(snapshot.status, TimerStatus::Ready);
    assert_eq!(snapshot.remaining_secs, snapshot.configured_secs);
    assert!(!timer.alert_active());

    let beeps = count.load(Ordering::SeqCst);
    time::advance(Duration::from_secs(3)).await;
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), beeps);
}

#[tokio::test(start_paused = true)]
async fn stop_silences_a_finished_timer_without_rearming() {
    let config = TimerConfig::default();
    let (timer, _) = timer_with_counter(&config);
    timer.configure("Tea", "1").expect("valid input");

    run_ticks(&config, 70).await;
    assert!(timer.alert_active());

    timer.stop().await;
    assert!(!timer.alert_active());
    // Remaining time is zero, so the status stays Finished rather than
    // pretending the countdown could resume.
    assert_eq!(timer.status(), TimerStatus::Finished);

    // A fresh start re-arms through configure with the stored inputs.
    timer.start().expect("stored inputs are valid");
    let snapshot = timer.snapshot();
    assert_eq!(snapshot.status, TimerStatus::Running);
    assert_eq!(snapshot.remaining_secs, 1.0);
    assert!(!timer.alert_active());
}

#[tokio::test(start_paused = true)]
async fn rearming_a_finished_timer_stops_the_old_alert() {
    let config = TimerConfig::default();
    let (timer, count) = timer_with_counter(&config);
    timer.configure("Tea", "1").expect("valid input");
    run_ticks(&config, 70).await;
    assert!(timer.alert_active());

    timer.configure("Tea", "2").expect("valid input");
    settle().await;
    assert!(!timer.alert_active());

    let beeps = count.load(Ordering::SeqCst);
    time::advance(Duration::from_secs(1)).await;
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), beeps);
    assert_eq!(timer.status(), TimerStatus::Running);
}

#[tokio::test(start_paused = true)]
async fn stop_before_any_configuration_is_harmless() {
    let config = TimerConfig::default();
    let (timer, _) = timer_with_counter(&config);
    timer.stop().await;
    assert_eq!(timer.status(), TimerStatus::Unconfigured);
}

#[tokio::test(start_paused = true)]
async fn beeps_repeat_until_silenced() {
    let config = TimerConfig::default();
    let (timer, count) = timer_with_counter(&config);
    timer.configure("Tea", "1").expect("valid input");
    run_ticks(&config, 70).await;

    for expected in 1..=3 {
        time::advance(config.beep_interval).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), expected);
    }
}

#[tokio::test(start_paused = true)]
async fn shutdown_halts_all_activity() {
    let config = TimerConfig::default();
    let (timer, _) = timer_with_counter(&config);
    timer.configure("Tea", "5").expect("valid input");
    let mut watcher = timer.subscribe();

    timer.shutdown().await;
    settle().await;

    // The publishing side is gone; nothing moves the countdown anymore.
    assert!(watcher.has_changed().is_err());
}
