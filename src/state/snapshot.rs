//! Observable timer state and notifications
//!
//! A `TimerSnapshot` is published on a watch channel after every mutation,
//! so the presentation layer can either poll the latest value each render
//! frame or await changes. `TimerEvent` carries the notifications a user
//! should be alerted about.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::countdown::{CountdownState, TimerStatus};

/// Point-in-time view of one timer, safe to render from any thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub name: String,
    pub status: TimerStatus,
    pub remaining_secs: f64,
    pub configured_secs: f64,
}

impl TimerSnapshot {
    /// The state of a freshly created timer.
    pub(crate) fn unconfigured() -> Self {
        Self {
            name: String::new(),
            status: TimerStatus::Unconfigured,
            remaining_secs: 0.0,
            configured_secs: 0.0,
        }
    }

    /// Remaining time formatted as `HH:MM:SS.ss` for display.
    pub fn display_time(&self) -> String {
        format_hms(self.remaining_secs)
    }
}

impl From<&CountdownState> for TimerSnapshot {
    fn from(state: &CountdownState) -> Self {
        Self {
            name: state.name.clone(),
            status: state.status,
            remaining_secs: state.remaining_secs,
            configured_secs: state.configured_secs,
        }
    }
}

/// Notifications emitted by timers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// A countdown reached zero; the alert is now sounding.
    Finished {
        name: String,
        finished_at: DateTime<Utc>,
    },
}

/// Format a number of seconds as `HH:MM:SS.ss`.
pub fn format_hms(secs: f64) -> String {
    let total = secs.max(0.0);
    let hours = (total / 3600.0).floor();
    let minutes = ((total % 3600.0) / 60.0).floor();
    let seconds = total % 60.0;
    format!("{:02.0}:{:02.0}:{:05.2}", hours, minutes, seconds)
}
