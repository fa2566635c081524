//! Countdown ticker background task
//!
//! One ticker task per timer. It waits, paused, on a control channel;
//! while running it delivers evenly spaced ticks to its timer's state and
//! reacts to control changes between ticks. A fresh interval is created on
//! every resume, so pausing never shifts the configured period and missed
//! ticks are never replayed.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use crate::state::countdown::TickOutcome;
use crate::state::timer::{TickerControl, TimerShared};

pub(crate) async fn ticker_task(
    shared: Arc<TimerShared>,
    mut control_rx: watch::Receiver<TickerControl>,
) {
    loop {
        let control = *control_rx.borrow_and_update();
        match control {
            TickerControl::Shutdown => {
                debug!("Ticker shutting down");
                return;
            }
            TickerControl::Paused => {
                if control_rx.changed().await.is_err() {
                    return;
                }
                continue;
            }
            TickerControl::Running => {}
        }

        // The interval's immediate first tick is the one the resume guard
        // consumes, so resuming never double-counts the pause boundary.
        let mut ticks = interval(shared.tick_period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = ticks.tick() => {
                    if shared.apply_tick() == TickOutcome::Finished {
                        // The countdown parks on zero until the next command.
                        if control_rx.changed().await.is_err() {
                            return;
                        }
                        break;
                    }
                }
                changed = control_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    break;
                }
            }
        }
    }
}
