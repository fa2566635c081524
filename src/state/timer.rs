//! Per-timer orchestration and command surface
//!
//! A `Timer` is what the presentation layer holds. Commands lock and
//! mutate the countdown state, publish a fresh snapshot on the watch
//! channel, and steer the background ticker through a control channel.
//! Each timer exclusively owns one ticker task and one beeper; removing
//! the timer tears both down with a bounded join.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::audio::{default_alert, AlertFn};
use crate::config::TimerConfig;
use crate::error::ValidationError;
use crate::state::countdown::{
    parse_duration, validate_name, CountdownState, TickOutcome, TimerStatus,
};
use crate::state::snapshot::{TimerEvent, TimerSnapshot};
use crate::tasks::{join_with_timeout, ticker_task, Beeper};

/// Capacity of the finished-notification channel.
pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Commands steering a timer's ticker task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickerControl {
    Paused,
    Running,
    Shutdown,
}

/// State shared between a `Timer` handle and its background tasks.
pub(crate) struct TimerShared {
    pub(crate) tick_period: Duration,
    state: Mutex<CountdownState>,
    snapshot_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive so publishing snapshots never fails even
    /// before the presentation layer subscribes.
    _snapshot_rx: watch::Receiver<TimerSnapshot>,
    events_tx: broadcast::Sender<TimerEvent>,
    beeper: Beeper,
}

impl TimerShared {
    /// Deliver one tick from the ticker task.
    ///
    /// On the finish edge this parks nothing itself (the ticker does),
    /// but it emits the finished notification and starts the alert.
    pub(crate) fn apply_tick(&self) -> TickOutcome {
        let mut state = self.lock_state();
        let outcome = state.tick(self.tick_period.as_secs_f64());
        match outcome {
            TickOutcome::Resumed | TickOutcome::Ticked => self.publish(&state),
            TickOutcome::Finished => {
                self.publish(&state);
                let name = state.name.clone();
                // Started under the state lock, so commands that re-arm or
                // silence the timer serialize with the finish edge.
                self.beeper.start();
                drop(state);
                info!("Timer '{}' finished", name);
                let event = TimerEvent::Finished {
                    name,
                    finished_at: Utc::now(),
                };
                if let Err(e) = self.events_tx.send(event) {
                    warn!("Failed to send finished notification: {}", e);
                }
            }
            TickOutcome::Ignored => {}
        }
        outcome
    }

    fn publish(&self, state: &CountdownState) {
        if let Err(e) = self.snapshot_tx.send(TimerSnapshot::from(state)) {
            warn!("Failed to publish timer snapshot: {}", e);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, CountdownState> {
        // A poisoned lock only means another command panicked mid-update;
        // the countdown fields themselves stay consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One user-facing countdown timer.
pub struct Timer {
    shared: Arc<TimerShared>,
    control_tx: watch::Sender<TickerControl>,
    ticker: JoinHandle<()>,
    teardown_timeout: Duration,
    /// Standalone timers keep their own event channel open.
    _events_rx: Option<broadcast::Receiver<TimerEvent>>,
}

impl Timer {
    /// Create a standalone timer with the platform audio backend.
    ///
    /// Must be called inside a Tokio runtime; the ticker task is spawned
    /// immediately (paused).
    pub fn new(config: &TimerConfig) -> Self {
        Self::with_alert(config, default_alert(config))
    }

    /// Create a standalone timer with a custom "play one beep" capability.
    pub fn with_alert(config: &TimerConfig, alert: AlertFn) -> Self {
        let (events_tx, events_rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let mut timer = Self::spawn(config, alert, events_tx);
        timer._events_rx = Some(events_rx);
        timer
    }

    /// Spawn a timer publishing notifications on an existing channel.
    /// Collections use this so one subscription observes every timer.
    pub(crate) fn spawn(
        config: &TimerConfig,
        alert: AlertFn,
        events_tx: broadcast::Sender<TimerEvent>,
    ) -> Self {
        let (snapshot_tx, snapshot_rx) = watch::channel(TimerSnapshot::unconfigured());
        let shared = Arc::new(TimerShared {
            tick_period: config.tick_period,
            state: Mutex::new(CountdownState::new()),
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
            events_tx,
            beeper: Beeper::new(config.beep_interval, config.teardown_timeout, alert),
        });
        let (control_tx, control_rx) = watch::channel(TickerControl::Paused);
        let ticker = tokio::spawn(ticker_task(Arc::clone(&shared), control_rx));
        Self {
            shared,
            control_tx,
            ticker,
            teardown_timeout: config.teardown_timeout,
            _events_rx: None,
        }
    }

    /// Validate and commit a name and duration, then start counting down.
    ///
    /// Accepted from any state; re-arming a finished timer silences its
    /// alert before the new countdown begins. On a validation error no
    /// state changes and the error text is suitable for the user.
    pub fn configure(&self, name: &str, duration: &str) -> Result<(), ValidationError> {
        let secs = parse_duration(duration)?;
        validate_name(name)?;
        {
            let mut state = self.shared.lock_state();
            state.configure(name, secs);
            // Cancelled under the state lock: a countdown finishing at
            // this exact moment cannot leave its alert sounding into the
            // re-armed timer.
            self.shared.beeper.cancel();
            self.shared.publish(&state);
        }
        self.control_tx.send_replace(TickerControl::Running);
        info!("Timer '{}' configured for {}s", name, secs);
        Ok(())
    }

    /// Start or resume the countdown.
    ///
    /// When nothing valid was ever committed, or the countdown sits at
    /// zero, this delegates to [`configure`](Self::configure) with the
    /// inputs recorded by `set_name`/`set_duration`; that is the only
    /// path on which it can return a validation error. Otherwise it
    /// resumes, and the resume guard swallows the first tick so time
    /// spent paused is not double-counted.
    pub fn start(&self) -> Result<(), ValidationError> {
        let (needs_configure, status, name_input, duration_input) = {
            let state = self.shared.lock_state();
            (
                state.needs_configure(),
                state.status,
                state.name_input.clone(),
                state.duration_input.clone(),
            )
        };
        if needs_configure {
            return self.configure(&name_input, &duration_input);
        }
        if status == TimerStatus::Running {
            debug!("Timer already running, start ignored");
            return Ok(());
        }
        let remaining = {
            let mut state = self.shared.lock_state();
            state.resume();
            self.shared.publish(&state);
            state.remaining_secs
        };
        self.control_tx.send_replace(TickerControl::Running);
        info!("Timer resumed with {:.2}s remaining", remaining);
        Ok(())
    }

    /// Pause the countdown and silence the alert.
    ///
    /// Waits (bounded) for the alert loop to acknowledge, so no beep
    /// begins after this returns.
    pub async fn stop(&self) {
        {
            let mut state = self.shared.lock_state();
            state.pause();
            self.shared.publish(&state);
        }
        self.control_tx.send_replace(TickerControl::Paused);
        self.shared.beeper.stop().await;
        info!("Timer stopped");
    }

    /// Silence the alert and restore the full configured duration.
    pub async fn reset(&self) {
        {
            let mut state = self.shared.lock_state();
            state.reset();
            self.shared.publish(&state);
        }
        self.control_tx.send_replace(TickerControl::Paused);
        self.shared.beeper.stop().await;
        info!("Timer reset");
    }

    /// Record the name as typed; committed at the next `configure`.
    pub fn set_name(&self, text: &str) {
        self.shared.lock_state().name_input = text.to_string();
    }

    /// Record the duration as typed; validated at the next `configure`.
    pub fn set_duration(&self, text: &str) {
        self.shared.lock_state().duration_input = text.to_string();
    }

    /// Latest observable state.
    pub fn snapshot(&self) -> TimerSnapshot {
        self.shared.snapshot_tx.borrow().clone()
    }

    /// Watch observable state; the receiver always holds the latest value.
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.shared.snapshot_tx.subscribe()
    }

    /// Subscribe to this timer's notifications.
    pub fn events(&self) -> broadcast::Receiver<TimerEvent> {
        self.shared.events_tx.subscribe()
    }

    pub fn status(&self) -> TimerStatus {
        self.shared.lock_state().status
    }

    pub fn remaining_secs(&self) -> f64 {
        self.shared.lock_state().remaining_secs
    }

    pub fn name(&self) -> String {
        self.shared.lock_state().name.clone()
    }

    /// Whether the finish alert is currently sounding.
    pub fn alert_active(&self) -> bool {
        self.shared.beeper.is_active()
    }

    /// Stop the ticker and the alert for good.
    ///
    /// Both background tasks are joined with the configured teardown
    /// timeout; none of this timer's callbacks fire after this returns.
    pub async fn shutdown(self) {
        self.control_tx.send_replace(TickerControl::Shutdown);
        join_with_timeout(self.ticker, self.teardown_timeout, "ticker").await;
        self.shared.beeper.stop().await;
        debug!("Timer shut down");
    }
}
