//! Countdown state machine and input validation
//!
//! `CountdownState` is the synchronous heart of a timer: it owns the
//! committed name and duration, the remaining time, and the lifecycle
//! status, and applies ticks handed to it by the ticker task. It performs
//! no I/O, which keeps every transition unit-testable.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Accepted duration range, in whole seconds.
pub const MIN_DURATION_SECS: u32 = 1;
pub const MAX_DURATION_SECS: u32 = 3600;

/// Longest accepted timer name, in characters.
pub const MAX_NAME_CHARS: usize = 50;

/// Lifecycle status of a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerStatus {
    /// Freshly created, no valid duration committed yet.
    Unconfigured,
    /// A duration is committed and remaining time is full; not ticking.
    Ready,
    /// Ticking; remaining time decreasing.
    Running,
    /// Paused mid-countdown; resumable.
    Stopped,
    /// Remaining time reached zero; the alert is sounding until silenced.
    Finished,
}

/// What a delivered tick did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickOutcome {
    /// The timer was not running; nothing applied.
    Ignored,
    /// First tick after a resume, consumed by the resume guard.
    Resumed,
    /// Remaining time decreased and is still above zero.
    Ticked,
    /// Remaining time hit zero on this tick.
    Finished,
}

/// Mutable state of one timer.
#[derive(Debug, Clone)]
pub(crate) struct CountdownState {
    /// Committed display label.
    pub name: String,
    /// Raw name input, as last typed in the UI.
    pub name_input: String,
    /// Raw duration input, as last typed in the UI.
    pub duration_input: String,
    /// Committed duration in seconds.
    pub configured_secs: f64,
    /// Seconds left; always within `[0, configured_secs]`.
    pub remaining_secs: f64,
    pub status: TimerStatus,
    /// Suppresses the first decrement after a resume, so the immediate
    /// tick at the resume boundary does not double-count elapsed time.
    resume_guard: bool,
}

impl CountdownState {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            name_input: String::new(),
            duration_input: String::new(),
            configured_secs: 0.0,
            remaining_secs: 0.0,
            status: TimerStatus::Unconfigured,
            resume_guard: false,
        }
    }

    /// True when `start` must route through `configure`: nothing valid was
    /// ever committed, or the countdown sits at zero.
    pub fn needs_configure(&self) -> bool {
        self.status == TimerStatus::Unconfigured || self.remaining_secs == 0.0
    }

    /// Commit a validated name and duration and begin running.
    ///
    /// Callers validate first; this only applies the transition.
    pub fn configure(&mut self, name: &str, secs: u32) {
        self.name = name.to_string();
        self.name_input = name.to_string();
        self.duration_input = secs.to_string();
        self.configured_secs = f64::from(secs);
        self.remaining_secs = self.configured_secs;
        self.status = TimerStatus::Running;
        self.resume_guard = true;
    }

    /// Resume ticking from `Ready` or `Stopped`, arming the resume guard.
    pub fn resume(&mut self) {
        self.resume_guard = true;
        self.status = TimerStatus::Running;
    }

    /// Pause a running countdown. Any other status is left as-is, so
    /// stopping a `Finished` timer silences its alert without pretending
    /// the countdown is resumable.
    pub fn pause(&mut self) {
        if self.status == TimerStatus::Running {
            self.status = TimerStatus::Stopped;
        }
    }

    /// Restore the full configured duration and return to `Ready`.
    ///
    /// A timer that never committed a duration stays `Unconfigured`, so
    /// the next `start` still routes through `configure`.
    pub fn reset(&mut self) {
        self.remaining_secs = self.configured_secs;
        self.resume_guard = false;
        self.status = if self.configured_secs > 0.0 {
            TimerStatus::Ready
        } else {
            TimerStatus::Unconfigured
        };
    }

    /// Apply one tick of `period_secs`. The decrement clamps at zero and
    /// the transition to `Finished` happens on the tick that reaches it.
    pub fn tick(&mut self, period_secs: f64) -> TickOutcome {
        if self.status != TimerStatus::Running {
            return TickOutcome::Ignored;
        }
        if self.resume_guard {
            self.resume_guard = false;
            return TickOutcome::Resumed;
        }
        if self.remaining_secs > 0.0 {
            self.remaining_secs = (self.remaining_secs - period_secs).max(0.0);
        }
        if self.remaining_secs == 0.0 {
            self.status = TimerStatus::Finished;
            return TickOutcome::Finished;
        }
        TickOutcome::Ticked
    }
}

/// Validate a duration input string: a plain decimal integer within
/// [`MIN_DURATION_SECS`, `MAX_DURATION_SECS`].
pub fn parse_duration(text: &str) -> Result<u32, ValidationError> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::DurationNotANumber);
    }
    // All-digit input that overflows u32 is far outside the range anyway.
    let secs: u32 = text
        .parse()
        .map_err(|_| ValidationError::DurationOutOfRange)?;
    if !(MIN_DURATION_SECS..=MAX_DURATION_SECS).contains(&secs) {
        return Err(ValidationError::DurationOutOfRange);
    }
    Ok(secs)
}

/// Validate a timer name: 1 to [`MAX_NAME_CHARS`] characters.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let chars = name.chars().count();
    if chars == 0 || chars > MAX_NAME_CHARS {
        return Err(ValidationError::NameLength);
    }
    Ok(())
}
