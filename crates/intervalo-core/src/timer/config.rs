use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Durations and iteration count for one set.
///
/// Every field is at least 1: a zero-length phase would never count down
/// and a zero duration would divide by zero in progress reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTimerConfig")]
pub struct TimerConfig {
    session_seconds: u32,
    break_seconds: u32,
    total_iterations: u32,
}

#[derive(Deserialize)]
struct RawTimerConfig {
    session_seconds: u32,
    break_seconds: u32,
    total_iterations: u32,
}

impl TryFrom<RawTimerConfig> for TimerConfig {
    type Error = ConfigError;

    fn try_from(raw: RawTimerConfig) -> Result<Self, Self::Error> {
        Self::new(raw.session_seconds, raw.break_seconds, raw.total_iterations)
    }
}

impl TimerConfig {
    pub const DEFAULT_SESSION_SECONDS: u32 = 40;
    pub const DEFAULT_BREAK_SECONDS: u32 = 10;
    pub const DEFAULT_ITERATIONS: u32 = 6;

    /// Build a config, rejecting any zero value.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` naming the first zero field.
    pub fn new(
        session_seconds: u32,
        break_seconds: u32,
        total_iterations: u32,
    ) -> Result<Self, ConfigError> {
        for (key, value) in [
            ("session_seconds", session_seconds),
            ("break_seconds", break_seconds),
            ("total_iterations", total_iterations),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        Ok(Self {
            session_seconds,
            break_seconds,
            total_iterations,
        })
    }

    /// Build a config, raising any zero value to 1.
    pub fn coerced(session_seconds: u32, break_seconds: u32, total_iterations: u32) -> Self {
        Self {
            session_seconds: session_seconds.max(1),
            break_seconds: break_seconds.max(1),
            total_iterations: total_iterations.max(1),
        }
    }

    pub fn session_seconds(&self) -> u32 {
        self.session_seconds
    }

    pub fn break_seconds(&self) -> u32 {
        self.break_seconds
    }

    pub fn total_iterations(&self) -> u32 {
        self.total_iterations
    }

    /// Ticks needed to run one full set: every session, and every break
    /// except the one after the last session.
    pub fn ticks_per_set(&self) -> u64 {
        let n = u64::from(self.total_iterations);
        n * u64::from(self.session_seconds) + (n - 1) * u64::from(self.break_seconds)
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            session_seconds: Self::DEFAULT_SESSION_SECONDS,
            break_seconds: Self::DEFAULT_BREAK_SECONDS,
            total_iterations: Self::DEFAULT_ITERATIONS,
        }
    }
}
