//! # Engine Configuration
//!
//! Tunables for the bulk operation engine.
//!
//! ## Overview
//!
//! [`EngineConfig`] is built through [`EngineConfigBuilder`], which starts
//! from production defaults and validates the result in `build()`. Invalid
//! combinations fail fast with an actionable [`Error::Config`].
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::EngineConfig;
//! use std::time::Duration;
//!
//! let config = EngineConfig::builder()
//!     .fetch_concurrency(8)
//!     .retry_delay(Duration::from_millis(600))
//!     .build()?;
//! ```
//!
//! ## Defaults
//!
//! | Setting | Default |
//! |---------|---------|
//! | fetch / removal concurrency | `min(32, cpus + 4)` |
//! | max attempts per mutation | 10 |
//! | delay between conflict retries | 600 ms |
//! | pacing after each like | uniform in [1.2 s, 2.0 s) |
//! | name match threshold / cap | 70 / 10 |
//! | default track limit | 100 |

use crate::error::{Error, Result};
use std::time::Duration;

/// Upper bound on the default worker count, regardless of CPU count
const MAX_DEFAULT_WORKERS: usize = 32;

/// Extra workers on top of the CPU count; remote calls are I/O bound
const IO_WORKER_HEADROOM: usize = 4;

/// Worker count used when no concurrency is configured.
pub fn default_concurrency() -> usize {
    (num_cpus::get() + IO_WORKER_HEADROOM).min(MAX_DEFAULT_WORKERS)
}

/// Validated engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Workers used by the bounded parallel fetcher
    pub fetch_concurrency: usize,

    /// Workers used by bulk track removal
    pub removal_concurrency: usize,

    /// Total attempts per mutation, including the first one
    pub max_attempts: u32,

    /// Fixed delay between attempts after a conflict
    pub retry_delay: Duration,

    /// Lower bound of the pause after each like
    pub like_delay_min: Duration,

    /// Exclusive upper bound of the pause after each like
    pub like_delay_max: Duration,

    /// Minimum similarity score (0-100) for a name to match a search term
    pub match_threshold: u8,

    /// Maximum number of names returned by a search
    pub match_limit: usize,

    /// Track limit for fetches that only need playlist metadata
    pub default_track_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let workers = default_concurrency();
        Self {
            fetch_concurrency: workers,
            removal_concurrency: workers,
            max_attempts: 10,
            retry_delay: Duration::from_millis(600),
            like_delay_min: Duration::from_millis(1200),
            like_delay_max: Duration::from_millis(2000),
            match_threshold: 70,
            match_limit: 10,
            default_track_limit: 100,
        }
    }
}

impl EngineConfig {
    /// Start a builder seeded with the defaults.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder {
            config: Self::default(),
        }
    }

    /// Check every invariant the engine relies on.
    pub fn validate(&self) -> Result<()> {
        if self.fetch_concurrency == 0 {
            return Err(Error::Config(
                "fetch_concurrency must be at least 1".to_string(),
            ));
        }

        if self.removal_concurrency == 0 {
            return Err(Error::Config(
                "removal_concurrency must be at least 1".to_string(),
            ));
        }

        if self.max_attempts == 0 {
            return Err(Error::Config(
                "max_attempts must be at least 1 (the initial attempt)".to_string(),
            ));
        }

        if self.like_delay_min > self.like_delay_max {
            return Err(Error::Config(format!(
                "like_delay_min ({:?}) exceeds like_delay_max ({:?})",
                self.like_delay_min, self.like_delay_max
            )));
        }

        if self.match_threshold > 100 {
            return Err(Error::Config(format!(
                "match_threshold must be within 0-100, got {}",
                self.match_threshold
            )));
        }

        if self.match_limit == 0 {
            return Err(Error::Config("match_limit must be at least 1".to_string()));
        }

        Ok(())
    }
}

/// Builder for [`EngineConfig`]
#[derive(Debug, Clone)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Set fetch workers
    pub fn fetch_concurrency(mut self, workers: usize) -> Self {
        self.config.fetch_concurrency = workers;
        self
    }

    /// Set removal workers
    pub fn removal_concurrency(mut self, workers: usize) -> Self {
        self.config.removal_concurrency = workers;
        self
    }

    /// Set both worker counts at once
    pub fn concurrency(self, workers: usize) -> Self {
        self.fetch_concurrency(workers).removal_concurrency(workers)
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config.retry_delay = delay;
        self
    }

    /// Set the pacing window applied after each like
    pub fn like_delay(mut self, min: Duration, max: Duration) -> Self {
        self.config.like_delay_min = min;
        self.config.like_delay_max = max;
        self
    }

    pub fn match_threshold(mut self, threshold: u8) -> Self {
        self.config.match_threshold = threshold;
        self
    }

    pub fn match_limit(mut self, limit: usize) -> Self {
        self.config.match_limit = limit;
        self
    }

    pub fn default_track_limit(mut self, limit: usize) -> Self {
        self.config.default_track_limit = limit;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();

        assert_eq!(config.max_attempts, 10);
        assert_eq!(config.retry_delay, Duration::from_millis(600));
        assert_eq!(config.like_delay_min, Duration::from_millis(1200));
        assert_eq!(config.like_delay_max, Duration::from_millis(2000));
        assert_eq!(config.match_threshold, 70);
        assert_eq!(config.match_limit, 10);
        assert_eq!(config.default_track_limit, 100);
        assert!(config.fetch_concurrency >= 1);
        assert!(config.fetch_concurrency <= MAX_DEFAULT_WORKERS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = EngineConfig::builder()
            .concurrency(3)
            .max_attempts(4)
            .retry_delay(Duration::from_millis(5))
            .like_delay(Duration::ZERO, Duration::from_millis(1))
            .match_threshold(80)
            .match_limit(5)
            .default_track_limit(25)
            .build()
            .unwrap();

        assert_eq!(config.fetch_concurrency, 3);
        assert_eq!(config.removal_concurrency, 3);
        assert_eq!(config.max_attempts, 4);
        assert_eq!(config.retry_delay, Duration::from_millis(5));
        assert_eq!(config.match_threshold, 80);
        assert_eq!(config.match_limit, 5);
        assert_eq!(config.default_track_limit, 25);
    }

    #[test]
    fn test_rejects_zero_workers() {
        let result = EngineConfig::builder().fetch_concurrency(0).build();
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("fetch_concurrency")));

        let result = EngineConfig::builder().removal_concurrency(0).build();
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("removal_concurrency")));
    }

    #[test]
    fn test_rejects_zero_attempts() {
        let result = EngineConfig::builder().max_attempts(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_inverted_like_window() {
        let result = EngineConfig::builder()
            .like_delay(Duration::from_secs(2), Duration::from_secs(1))
            .build();
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("like_delay_min")));
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        assert!(EngineConfig::builder().match_threshold(101).build().is_err());
        assert!(EngineConfig::builder().match_threshold(100).build().is_ok());
        assert!(EngineConfig::builder().match_limit(0).build().is_err());
    }
}
