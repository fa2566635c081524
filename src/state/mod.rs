//! State management module
//!
//! This module contains the countdown state machine, the per-timer
//! orchestration around it, the observable snapshot types, and the
//! ordered timer collection.

pub mod collection;
pub mod countdown;
pub mod snapshot;
pub mod timer;

#[cfg(test)]
mod timer_tests;

// Re-export main types
pub use collection::TimerCollection;
pub use countdown::{
    parse_duration, validate_name, TimerStatus, MAX_DURATION_SECS, MAX_NAME_CHARS,
    MIN_DURATION_SECS,
};
pub use snapshot::{format_hms, TimerEvent, TimerSnapshot};
pub use timer::Timer;
