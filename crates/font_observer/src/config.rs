//! Configuration for font load observation.
//!
//! Timeouts, polling cadence and the engine identification string can be loaded from
//! environment variables or constructed programmatically.

use core::time::Duration;
use std::env;

/// Default time to wait for a font before giving up, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

/// Default delay between two measurement ticks, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 25;

/// Runtime configuration for a [`FontFaceObserver`](crate::FontFaceObserver).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObserverConfig {
    /// Deadline for the font to swap in, measured from the first tick
    pub timeout_ms: u64,
    /// Delay between measurement ticks (minimum 1ms)
    pub poll_interval_ms: u64,
    /// Engine identification string used by the fallback defect check
    pub user_agent: Option<String>,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS, None)
    }
}

impl ObserverConfig {
    /// Construct a new `ObserverConfig` with explicit values.
    ///
    /// # Arguments
    ///
    /// * `timeout_ms` - Deadline in milliseconds
    /// * `poll_interval_ms` - Tick period in milliseconds (minimum 1ms)
    /// * `user_agent` - Engine identification string, if known
    #[inline]
    #[must_use]
    pub const fn new(timeout_ms: u64, poll_interval_ms: u64, user_agent: Option<String>) -> Self {
        let interval = if poll_interval_ms < 1 {
            1
        } else {
            poll_interval_ms
        };
        Self {
            timeout_ms,
            poll_interval_ms: interval,
            user_agent,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `FONT_OBSERVER_TIMEOUT_MS`: Deadline in milliseconds (default: 3000)
    /// - `FONT_OBSERVER_POLL_INTERVAL_MS`: Tick period in milliseconds (default: 25)
    /// - `FONT_OBSERVER_USER_AGENT`: Engine identification string
    #[inline]
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from any variable source, such as the environment.
    ///
    /// Unparseable numbers fall back to the defaults and an empty user agent counts as unset.
    ///
    /// # Arguments
    ///
    /// * `lookup` - Returns the value of a variable, or `None` if it is not set
    #[must_use]
    pub fn from_vars<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let millis = |key: &str, default: u64| {
            lookup(key)
                .and_then(|val| val.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };
        let timeout_ms = millis("FONT_OBSERVER_TIMEOUT_MS", DEFAULT_TIMEOUT_MS);
        let poll_interval_ms = millis("FONT_OBSERVER_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS);
        let user_agent = lookup("FONT_OBSERVER_USER_AGENT").filter(|agent| !agent.is_empty());
        Self::new(timeout_ms, poll_interval_ms, user_agent)
    }

    /// Replace the timeout, keeping the other settings.
    #[inline]
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Get the deadline as a `Duration`.
    #[inline]
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get the tick period as a `Duration`.
    #[inline]
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Test that the poll interval is clamped to one millisecond.
    ///
    /// # Panics
    /// Panics if a zero interval is accepted.
    #[test]
    fn test_poll_interval_clamped() {
        let config = ObserverConfig::new(50, 0, None);
        assert_eq!(config.poll_interval(), Duration::from_millis(1));
        assert_eq!(config.timeout(), Duration::from_millis(50));
    }

    fn vars(pairs: &[(&str, &str)]) -> ObserverConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, val)| ((*key).to_owned(), (*val).to_owned()))
            .collect();
        ObserverConfig::from_vars(|key| map.get(key).cloned())
    }

    /// Test reading every variable.
    ///
    /// # Panics
    /// Panics if a variable is ignored or misparsed.
    #[test]
    fn test_from_vars_reads_values() {
        let config = vars(&[
            ("FONT_OBSERVER_TIMEOUT_MS", "1500"),
            ("FONT_OBSERVER_POLL_INTERVAL_MS", " 10 "),
            ("FONT_OBSERVER_USER_AGENT", "AppleWebKit/536.11"),
        ]);
        assert_eq!(config.timeout_ms, 1500);
        assert_eq!(config.poll_interval_ms, 10);
        assert_eq!(config.user_agent.as_deref(), Some("AppleWebKit/536.11"));
    }

    /// Test that bad or missing values fall back to the defaults.
    ///
    /// # Panics
    /// Panics if a bad value leaks into the configuration.
    #[test]
    fn test_from_vars_falls_back() {
        assert_eq!(vars(&[]), ObserverConfig::default());
        let config = vars(&[
            ("FONT_OBSERVER_TIMEOUT_MS", "soon"),
            ("FONT_OBSERVER_POLL_INTERVAL_MS", "-5"),
            ("FONT_OBSERVER_USER_AGENT", ""),
        ]);
        assert_eq!(config, ObserverConfig::default());
        assert_eq!(vars(&[("FONT_OBSERVER_POLL_INTERVAL_MS", "0")]).poll_interval_ms, 1);
    }

    /// Test the defaults.
    ///
    /// # Panics
    /// Panics if the defaults drift.
    #[test]
    fn test_defaults() {
        let config = ObserverConfig::default();
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert_eq!(config.user_agent, None);
        assert_eq!(config.with_timeout_ms(300).timeout_ms, 300);
    }
}
