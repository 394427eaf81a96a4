use std::env;
use std::time::Duration;

use crate::error::AppError;

/// Runtime knobs for the match engine. All timing is expressed as
/// `Duration`; everything has a sane default so the server runs with no
/// environment configured at all.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub play_decision_timeout: Duration,
    pub tribute_decision_timeout: Duration,
    pub heartbeat_timeout: Duration,
    pub match_idle_timeout: Duration,
    /// Fixed shuffle seed, for deterministic replay in tests. `None` means
    /// seed from the OS RNG at deal time.
    pub shuffle_seed: Option<u64>,
    pub event_queue_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            play_decision_timeout: Duration::from_secs(30),
            tribute_decision_timeout: Duration::from_secs(30),
            heartbeat_timeout: Duration::from_secs(60),
            match_idle_timeout: Duration::from_secs(5 * 60),
            shuffle_seed: None,
            event_queue_capacity: 256,
        }
    }
}

fn env_secs(name: &str, default: Duration) -> Result<Duration, AppError> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => {
            let secs: u64 = raw
                .parse()
                .map_err(|_| AppError::config(format!("{name} must be an integer number of seconds, got '{raw}'")))?;
            Ok(Duration::from_secs(secs))
        }
    }
}

fn env_usize(name: &str, default: usize) -> Result<usize, AppError> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::config(format!("{name} must be a positive integer, got '{raw}'"))),
    }
}

impl EngineConfig {
    /// Load from environment, falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = EngineConfig::default();
        Ok(EngineConfig {
            play_decision_timeout: env_secs("GUANDAN_PLAY_TIMEOUT_SECS", defaults.play_decision_timeout)?,
            tribute_decision_timeout: env_secs(
                "GUANDAN_TRIBUTE_TIMEOUT_SECS",
                defaults.tribute_decision_timeout,
            )?,
            heartbeat_timeout: env_secs("GUANDAN_HEARTBEAT_TIMEOUT_SECS", defaults.heartbeat_timeout)?,
            match_idle_timeout: env_secs("GUANDAN_MATCH_IDLE_TIMEOUT_SECS", defaults.match_idle_timeout)?,
            shuffle_seed: match env::var("GUANDAN_SHUFFLE_SEED") {
                Err(_) => None,
                Ok(raw) => Some(
                    raw.parse()
                        .map_err(|_| AppError::config(format!("GUANDAN_SHUFFLE_SEED must be a u64, got '{raw}'")))?,
                ),
            },
            event_queue_capacity: env_usize("GUANDAN_EVENT_QUEUE_CAPACITY", defaults.event_queue_capacity)?,
        })
    }
}

#[cfg(test)]
mod tests_config {
    use super::*;

    #[test]
    fn defaults_match_the_documented_table() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.play_decision_timeout, Duration::from_secs(30));
        assert_eq!(cfg.heartbeat_timeout, Duration::from_secs(60));
        assert_eq!(cfg.match_idle_timeout, Duration::from_secs(300));
        assert_eq!(cfg.event_queue_capacity, 256);
        assert!(cfg.shuffle_seed.is_none());
    }
}
