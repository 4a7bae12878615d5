use std::time::Duration;

use thiserror::Error;

/// The deadline given to [`timeout`] elapsed before the wrapped future settled.
///
/// [`timeout`]: crate::timeout()
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Timeout: Promise did not resolve within {} milliseconds", millis(.budget))]
pub struct TimeoutError {
    budget: Duration,
}

impl TimeoutError {
    pub(crate) fn new(budget: Duration) -> Self {
        Self { budget }
    }

    /// The duration the wrapped future was given.
    pub fn budget(&self) -> Duration {
        self.budget
    }
}

// whole milliseconds print as integers, anything finer keeps its fraction
fn millis(budget: &Duration) -> String {
    if budget.subsec_nanos() % 1_000_000 == 0 {
        budget.as_millis().to_string()
    } else {
        (budget.as_secs_f64() * 1000.0).to_string()
    }
}

/// Malformed options passed to [`retry`].
///
/// These are reported before the first attempt runs.
///
/// [`retry`]: crate::retry()
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryConfigError {
    #[error("No parameters given")]
    NoParameters,
    #[error("Unsupported argument type for 'times': {0}")]
    UnsupportedTimes(&'static str),
    #[error("'interval' may not be Infinity")]
    InfiniteInterval,
}

/// Every [`Resolver`] of a deferred pair was dropped before settling it.
///
/// [`Resolver`]: crate::defer::Resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deferred promise was abandoned without being settled")]
pub struct Abandoned;
