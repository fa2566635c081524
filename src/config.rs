//! Runtime configuration for timers and alerting

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::audio::Playback;

/// Tunables shared by every timer in a collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Countdown update period. 60 Hz keeps sub-second displays smooth.
    #[serde(with = "duration_secs")]
    pub tick_period: Duration,

    /// Delay between repeated alert beeps once a timer finishes.
    #[serde(with = "duration_secs")]
    pub beep_interval: Duration,

    /// How long teardown waits for a background task before aborting it.
    #[serde(with = "duration_secs")]
    pub teardown_timeout: Duration,

    /// Sound file handed to external players. Bell-only when unset.
    pub alert_sound: Option<PathBuf>,

    /// Playback strategies tried in order. Platform default when unset.
    pub playback: Option<Vec<Playback>>,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_secs_f64(1.0 / 60.0),
            beep_interval: Duration::from_secs(1),
            teardown_timeout: Duration::from_secs(2),
            alert_sound: None,
            playback: None,
        }
    }
}

/// Serialize a `Duration` as a number of seconds (fractions allowed).
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        if !secs.is_finite() || secs < 0.0 {
            return Err(serde::de::Error::custom(format!(
                "invalid duration in seconds: {}",
                secs
            )));
        }
        Ok(Duration::from_secs_f64(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_rates() {
        let config = TimerConfig::default();
        assert_eq!(config.tick_period, Duration::from_secs_f64(1.0 / 60.0));
        assert_eq!(config.beep_interval, Duration::from_secs(1));
        assert_eq!(config.teardown_timeout, Duration::from_secs(2));
        assert!(config.alert_sound.is_none());
        assert!(config.playback.is_none());
    }

    #[test]
    fn durations_deserialize_from_seconds() {
        let config: TimerConfig =
            serde_json::from_str(r#"{ "tick_period": 0.25, "beep_interval": 1.5 }"#)
                .expect("valid config");
        assert_eq!(config.tick_period, Duration::from_secs_f64(0.25));
        assert_eq!(config.beep_interval, Duration::from_secs_f64(1.5));
        // Unlisted fields keep their defaults.
        assert_eq!(config.teardown_timeout, Duration::from_secs(2));
    }

    #[test]
    fn negative_durations_are_rejected() {
        let result: Result<TimerConfig, _> = serde_json::from_str(r#"{ "tick_period": -1.0 }"#);
        assert!(result.is_err());
    }
}
