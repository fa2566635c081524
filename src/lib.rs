//! Multitimer - multi-instance countdown timers with repeating alerts
//!
//! This library provides independently named countdown timers, each driven
//! by its own background ticker and silenced-on-demand finish beeper. The
//! presentation layer issues commands (configure, start, stop, reset) and
//! renders the observable snapshots; audio playback sits behind a single
//! replaceable "play one beep" capability. Timers spawn background tasks,
//! so they must be created inside a Tokio runtime.

pub mod audio;
pub mod config;
pub mod error;
pub mod state;
pub mod tasks;

// Re-export commonly used types
pub use audio::{default_alert, AlertChain, AlertFn, Playback};
pub use config::TimerConfig;
pub use error::ValidationError;
pub use state::{Timer, TimerCollection, TimerEvent, TimerSnapshot, TimerStatus};
pub use tasks::Beeper;
