//! Error types for timer commands

use thiserror::Error;

/// Rejected user input.
///
/// The command that produced it is dropped and the timer's prior state is
/// preserved. The `Display` text is meant to be shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Duration input was empty or not a whole number of seconds.
    #[error("enter a time in whole seconds")]
    DurationNotANumber,

    /// Duration input parsed but falls outside the accepted range.
    #[error("time must be between 1 and 3600 seconds")]
    DurationOutOfRange,

    /// Name is empty or longer than the accepted maximum.
    #[error("name must be between 1 and 50 characters")]
    NameLength,
}
