//! Retry utilities: backoff configuration for store calls.
//!
//! Uses `backon` for exponential backoff with jitter.

use std::time::Duration;

use backon::ExponentialBuilder;
use serde::Deserialize;

/// Backoff settings for the optional retry layer.
///
/// Retries are off unless `enabled` is set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub enabled: bool,
    /// Delay before the first retry.
    pub min_delay_ms: u64,
    /// Cap on any single delay.
    pub max_delay_ms: u64,
    /// Retries after the initial attempt.
    pub max_times: usize,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_delay_ms: 50,
            max_delay_ms: 2000,
            max_times: 5,
        }
    }
}

impl RetryConfig {
    /// Build the exponential backoff described by this config.
    ///
    /// Jitter is always enabled.
    pub fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(self.min_delay_ms))
            .with_max_delay(Duration::from_millis(self.max_delay_ms))
            .with_max_times(self.max_times)
            .with_jitter()
    }
}
