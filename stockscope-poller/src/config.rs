//! Poller configuration
//!
//! Defines the interval between checks and the two retry limits. The
//! defaults encode the capped policy: a check every 30 seconds, at most 8
//! "still working" answers, and a stop on the first failed check so a costly
//! backend is not called again after it errors.

use std::time::Duration;

use crate::error::PollError;

const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);
const DEFAULT_MAX_ATTEMPTS: u32 = 8;
const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 1;

/// Poller configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay before each check, including the first
    pub interval: Duration,

    /// Number of `not_ready` answers tolerated before timing out
    pub max_attempts: u32,

    /// Number of back-to-back failed checks tolerated before failing
    pub max_consecutive_failures: u32,
}

impl PollConfig {
    /// Creates a configuration with the given interval and default limits
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - POLL_INTERVAL_SECS (default: 30)
    /// - POLL_MAX_ATTEMPTS (default: 8)
    /// - POLL_MAX_FAILURES (default: 1)
    ///
    /// Missing or unparsable values fall back to the defaults; the result is
    /// validated before it is returned.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let interval = lookup("POLL_INTERVAL_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.interval);

        let max_attempts = lookup("POLL_MAX_ATTEMPTS")
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(defaults.max_attempts);

        let max_consecutive_failures = lookup("POLL_MAX_FAILURES")
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(defaults.max_consecutive_failures);

        let config = Self {
            interval,
            max_attempts,
            max_consecutive_failures,
        };
        config.validate()?;

        Ok(config)
    }

    /// Sets the attempt limit
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the consecutive-failure limit
    pub fn with_max_consecutive_failures(mut self, max_consecutive_failures: u32) -> Self {
        self.max_consecutive_failures = max_consecutive_failures;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), PollError> {
        if self.interval.is_zero() {
            return Err(PollError::InvalidConfig(
                "interval must be greater than 0".to_string(),
            ));
        }

        if self.max_attempts == 0 {
            return Err(PollError::InvalidConfig(
                "max_attempts must be greater than 0".to_string(),
            ));
        }

        if self.max_consecutive_failures == 0 {
            return Err(PollError::InvalidConfig(
                "max_consecutive_failures must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_consecutive_failures: DEFAULT_MAX_CONSECUTIVE_FAILURES,
        }
    }
}
