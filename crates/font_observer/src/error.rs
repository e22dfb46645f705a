use core::time::Duration;
use thiserror::Error;

/// Why an observation did not confirm the font.
#[derive(Debug, Error)]
pub enum ObserveError {
    /// The font never swapped in before the deadline.
    #[error("font `{family}` did not load within {elapsed:?}")]
    Timeout {
        /// Observed family.
        family: String,
        /// Time spent polling.
        elapsed: Duration,
    },
    /// The fallback baselines could not be measured, so polling never started.
    #[error("cannot measure fallback fonts for `{family}`")]
    Measurement {
        /// Observed family.
        family: String,
        /// Failure reported by the text measurer.
        #[source]
        source: anyhow::Error,
    },
}

impl ObserveError {
    /// Whether this is a deadline expiry.
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
