//! Repeating alert loop
//!
//! While a timer sits in `Finished`, its beeper requests one alert per
//! interval on a dedicated task until it is explicitly stopped. The beeper
//! never decides *how* sound is made; it only invokes the injected
//! [`AlertFn`] capability.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use super::join_with_timeout;
use crate::audio::AlertFn;

/// A handle to the (at most one) live alert loop of a timer.
pub struct Beeper {
    interval: Duration,
    join_timeout: Duration,
    alert: AlertFn,
    slot: Mutex<Option<BeepTask>>,
}

struct BeepTask {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Beeper {
    pub fn new(interval: Duration, join_timeout: Duration, alert: AlertFn) -> Self {
        Self {
            interval,
            join_timeout,
            alert,
            slot: Mutex::new(None),
        }
    }

    /// Begin beeping. A no-op while an alert loop is already live.
    pub fn start(&self) {
        let mut slot = self.lock_slot();
        if let Some(task) = slot.as_ref() {
            if !task.handle.is_finished() {
                debug!("Beeper already active, start ignored");
                return;
            }
        }
        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(beep_loop(self.interval, self.alert.clone(), stop_rx));
        *slot = Some(BeepTask { stop_tx, handle });
        debug!("Beeper started");
    }

    /// Stop beeping and wait (bounded) for the loop to acknowledge.
    ///
    /// No new alert begins after this returns; at most one alert already
    /// in flight may still complete. A no-op when nothing is beeping.
    pub async fn stop(&self) {
        let task = self.lock_slot().take();
        let Some(task) = task else {
            return;
        };
        task.stop_tx.send_replace(true);
        join_with_timeout(task.handle, self.join_timeout, "beeper").await;
        debug!("Beeper stopped");
    }

    /// Signal the loop to stop without waiting for it.
    ///
    /// Used when re-arming a timer from synchronous code; the loop exits
    /// on its own as soon as it observes the signal.
    pub(crate) fn cancel(&self) {
        let task = self.lock_slot().take();
        if let Some(task) = task {
            task.stop_tx.send_replace(true);
            debug!("Beeper cancelled");
        }
    }

    /// Whether an alert loop is currently live.
    pub fn is_active(&self) -> bool {
        self.lock_slot()
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }

    fn lock_slot(&self) -> std::sync::MutexGuard<'_, Option<BeepTask>> {
        // A poisoned slot only means an alert callback panicked; the
        // bookkeeping inside is still valid.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One alert per interval until the stop signal arrives.
///
/// The first beep lands one full interval after the alert starts, and
/// missed beeps are paced from the previous one rather than replayed.
async fn beep_loop(period: Duration, alert: AlertFn, mut stop_rx: watch::Receiver<bool>) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = ticker.tick() => (alert)(),
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow_and_update() {
                    return;
                }
            }
        }
    }
}
