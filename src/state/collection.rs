//! Ordered collection of independent timers
//!
//! Mirrors the add-timer / remove-last-timer surface the presentation
//! layer binds its keys to. Every timer in a collection publishes its
//! finished notifications on one shared channel, so a single subscription
//! observes them all.

use futures::future::join_all;
use tokio::sync::broadcast;
use tracing::info;

use crate::audio::{default_alert, AlertFn};
use crate::config::TimerConfig;
use crate::state::snapshot::TimerEvent;
use crate::state::timer::{Timer, EVENT_CHANNEL_CAPACITY};

/// An ordered set of timers with no shared mutable state between them.
pub struct TimerCollection {
    config: TimerConfig,
    alert: AlertFn,
    events_tx: broadcast::Sender<TimerEvent>,
    /// Keeps the channel open while no UI subscriber is attached.
    _events_rx: broadcast::Receiver<TimerEvent>,
    timers: Vec<Timer>,
}

impl TimerCollection {
    /// Create an empty collection using the platform audio backend.
    pub fn new(config: TimerConfig) -> Self {
        let alert = default_alert(&config);
        Self::with_alert(config, alert)
    }

    /// Create an empty collection with a custom alert capability.
    pub fn with_alert(config: TimerConfig, alert: AlertFn) -> Self {
        let (events_tx, events_rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config,
            alert,
            events_tx,
            _events_rx: events_rx,
            timers: Vec::new(),
        }
    }

    /// Append a fresh timer and return it.
    ///
    /// Must be called inside a Tokio runtime (the timer spawns its ticker).
    pub fn add_timer(&mut self) -> &Timer {
        let timer = Timer::spawn(&self.config, self.alert.clone(), self.events_tx.clone());
        self.timers.push(timer);
        info!("Added timer ({} total)", self.timers.len());
        self.timers.last().expect("collection is non-empty after push")
    }

    /// Remove the most recently added timer, tearing down its ticker and
    /// beeper before returning. Returns `false` on an empty collection.
    pub async fn remove_last(&mut self) -> bool {
        match self.timers.pop() {
            Some(timer) => {
                timer.shutdown().await;
                info!("Removed last timer ({} left)", self.timers.len());
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Timer> {
        self.timers.get(index)
    }

    pub fn last(&self) -> Option<&Timer> {
        self.timers.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Timer> {
        self.timers.iter()
    }

    /// Notifications from every timer in the collection.
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.events_tx.subscribe()
    }

    /// Tear down every timer.
    pub async fn shutdown(mut self) {
        let timers = std::mem::take(&mut self.timers);
        join_all(timers.into_iter().map(Timer::shutdown)).await;
        info!("All timers stopped");
    }
}
