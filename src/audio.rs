//! Alert playback behind a single "play one beep" capability
//!
//! Playback is a list of strategies tried in order: external player
//! commands first, then the terminal bell. A strategy that fails (missing
//! program, player error, no sound file) falls through to the next one;
//! playback as a whole never reports an error to the countdown logic.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::debug;

use crate::config::TimerConfig;

/// The side effect the beeper invokes once per beep.
///
/// The production implementation plays the strategy chain fire-and-forget;
/// embedders (and tests) may inject anything else through the `with_alert`
/// constructors.
pub type AlertFn = Arc<dyn Fn() + Send + Sync>;

/// One playback strategy in the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Playback {
    /// Run an external player with the configured sound file appended.
    Player {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
    /// Write the ASCII bell character to stdout.
    TerminalBell,
    /// Do nothing, successfully.
    Silent,
}

impl Playback {
    /// Shorthand for a player invoked as `program [args..] <sound-file>`.
    pub fn player(program: &str, args: &[&str]) -> Self {
        Self::Player {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// An ordered list of playback strategies plus the sound file they share.
#[derive(Debug, Clone)]
pub struct AlertChain {
    cue: Option<PathBuf>,
    strategies: Vec<Playback>,
}

impl AlertChain {
    pub fn new(cue: Option<PathBuf>, strategies: Vec<Playback>) -> Self {
        Self { cue, strategies }
    }

    /// Build the chain from config, falling back to the platform default.
    pub fn from_config(config: &TimerConfig) -> Self {
        let strategies = config
            .playback
            .clone()
            .unwrap_or_else(default_strategies);
        Self::new(config.alert_sound.clone(), strategies)
    }

    /// Play a single alert, best effort.
    ///
    /// Tries each strategy in order and stops at the first success. When
    /// every strategy fails the alert is dropped silently.
    pub async fn play_once(&self) {
        for strategy in &self.strategies {
            if self.try_strategy(strategy).await {
                return;
            }
        }
        debug!("No playback strategy succeeded, alert dropped");
    }

    async fn try_strategy(&self, strategy: &Playback) -> bool {
        match strategy {
            Playback::Player { program, args } => {
                // Players need a sound file to play.
                let Some(cue) = &self.cue else {
                    return false;
                };
                let status = Command::new(program)
                    .args(args)
                    .arg(cue)
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .status()
                    .await;
                match status {
                    Ok(status) if status.success() => true,
                    Ok(status) => {
                        debug!("{} exited with {}, trying next strategy", program, status);
                        false
                    }
                    Err(e) => {
                        debug!("{} unavailable ({}), trying next strategy", program, e);
                        false
                    }
                }
            }
            Playback::TerminalBell => {
                use std::io::Write;

                let mut stdout = std::io::stdout();
                let _ = stdout.write_all(b"\x07");
                let _ = stdout.flush();
                true
            }
            Playback::Silent => true,
        }
    }
}

/// The built-in strategy order for the current platform.
///
/// Resolves the divergent player preferences of different desktops by
/// trying the common players for the platform and ending with the bell,
/// which needs no audio stack at all.
pub fn default_strategies() -> Vec<Playback> {
    let mut strategies = Vec::new();
    if cfg!(target_os = "macos") {
        strategies.push(Playback::player("afplay", &[]));
    }
    if cfg!(target_os = "linux") {
        strategies.push(Playback::player("paplay", &[]));
        strategies.push(Playback::player("aplay", &["-q"]));
    }
    strategies.push(Playback::TerminalBell);
    strategies
}

/// The production alert capability: play the chain without blocking the
/// beep loop, so a slow player never delays the next beep or a teardown.
pub fn default_alert(config: &TimerConfig) -> AlertFn {
    let chain = Arc::new(AlertChain::from_config(config));
    Arc::new(move || {
        let chain = Arc::clone(&chain);
        tokio::spawn(async move {
            chain.play_once().await;
        });
    })
}
