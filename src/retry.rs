use std::future::Future;
use std::time::Duration;

use crate::delay::delay;
use crate::error::RetryConfigError;
use crate::yield_now::yield_now;

const DEFAULT_TIMES: u64 = 5;

/// Attempt budget of [`retry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Times {
    /// Give up once this many attempts failed. A budget of zero still runs the task once.
    Limited(u64),
    /// Never give up.
    Unbounded,
}

impl Times {
    fn is_exhausted(self, attempts: u64) -> bool {
        match self {
            Times::Limited(times) => attempts >= times,
            Times::Unbounded => false,
        }
    }

    // numeric budgets follow the loosely typed convention:
    // infinity and negative counts retry forever
    fn from_count(count: f64) -> Result<Self, RetryConfigError> {
        if count.is_nan() {
            Err(RetryConfigError::UnsupportedTimes("NaN"))
        } else if count.is_infinite() {
            Ok(Times::Unbounded)
        } else if count.fract() != 0.0 {
            Err(RetryConfigError::UnsupportedTimes("fraction"))
        } else if count < 0.0 {
            Ok(Times::Unbounded)
        } else {
            // saturating cast, a budget that large is as good as unbounded
            Ok(Times::Limited(count as u64))
        }
    }
}

impl Default for Times {
    fn default() -> Self {
        Times::Limited(DEFAULT_TIMES)
    }
}

/// Validated configuration of [`retry`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    pub times: Times,
    /// Pause between a failed attempt and the next one.
    pub interval: Duration,
}

/// Loosely typed retry options, as they come from a caller or a configuration source.
///
/// Absent fields take their defaults: 5 attempts, no pause.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RetryOptions {
    /// Attempt budget. `f64::INFINITY` or a negative whole number retries forever.
    pub times: Option<f64>,
    /// Milliseconds between attempts. Must not be infinite.
    pub interval: Option<f64>,
}

impl RetryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn times(mut self, times: f64) -> Self {
        self.times = Some(times);
        self
    }

    pub fn unbounded(self) -> Self {
        self.times(f64::INFINITY)
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval.as_secs_f64() * 1000.0);
        self
    }

    pub fn interval_ms(mut self, interval: f64) -> Self {
        self.interval = Some(interval);
        self
    }
}

fn interval_from_ms(ms: f64) -> Result<Duration, RetryConfigError> {
    if ms == f64::INFINITY {
        return Err(RetryConfigError::InfiniteInterval);
    }

    // NaN and negative intervals mean no pause
    if !(ms > 0.0) {
        return Ok(Duration::ZERO);
    }

    Ok(Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::MAX))
}

/// The first argument of [`retry`]: nothing, a bare attempt count, options, or a policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RetryConfig {
    /// No options were given at all.
    Missing,
    Times(f64),
    Options(RetryOptions),
    Policy(RetryPolicy),
}

impl RetryConfig {
    /// Checks the configuration and fills in defaults.
    pub fn validate(self) -> Result<RetryPolicy, RetryConfigError> {
        match self {
            RetryConfig::Missing => Err(RetryConfigError::NoParameters),
            RetryConfig::Times(count) => Ok(RetryPolicy {
                times: Times::from_count(count)?,
                interval: Duration::ZERO,
            }),
            RetryConfig::Options(options) => Ok(RetryPolicy {
                times: options
                    .times
                    .map(Times::from_count)
                    .transpose()?
                    .unwrap_or_default(),
                interval: options
                    .interval
                    .map(interval_from_ms)
                    .transpose()?
                    .unwrap_or_default(),
            }),
            RetryConfig::Policy(policy) => Ok(policy),
        }
    }
}

impl From<u32> for RetryConfig {
    fn from(times: u32) -> Self {
        RetryConfig::Times(times.into())
    }
}

impl From<i32> for RetryConfig {
    fn from(times: i32) -> Self {
        RetryConfig::Times(times.into())
    }
}

impl From<f64> for RetryConfig {
    fn from(times: f64) -> Self {
        RetryConfig::Times(times)
    }
}

impl From<Times> for RetryConfig {
    fn from(times: Times) -> Self {
        RetryConfig::Policy(RetryPolicy {
            times,
            interval: Duration::ZERO,
        })
    }
}

impl From<RetryOptions> for RetryConfig {
    fn from(options: RetryOptions) -> Self {
        RetryConfig::Options(options)
    }
}

impl From<RetryPolicy> for RetryConfig {
    fn from(policy: RetryPolicy) -> Self {
        RetryConfig::Policy(policy)
    }
}

impl<C> From<Option<C>> for RetryConfig
where
    C: Into<RetryConfig>,
{
    fn from(config: Option<C>) -> Self {
        config.map_or(RetryConfig::Missing, Into::into)
    }
}

/// Calls `task` until it succeeds or the attempt budget is spent.
///
/// `task` receives the failure of the previous attempt (`None` on the first one). Once the
/// budget is spent, the last failure is returned. Invalid options are reported as a
/// [`RetryConfigError`] before any attempt runs.
///
/// ```
/// # async fn doc_retry() {
/// use async_flow::{retry, RetryOptions};
/// use futures::future::ready;
/// use std::time::Duration;
///
/// let mut calls = 0;
/// let outcome: Result<u32, Box<dyn std::error::Error + Send + Sync>> = retry(
///     RetryOptions::new().times(3.0).interval(Duration::from_millis(10)),
///     |_last_failure| {
///         calls += 1;
///         ready(if calls < 3 { Err("not yet".into()) } else { Ok(calls) })
///     },
/// )
/// .await;
///
/// assert_eq!(outcome.unwrap(), 3);
/// # }
/// ```
pub async fn retry<C, F, Fut, T, E>(options: C, mut task: F) -> Result<T, E>
where
    C: Into<RetryConfig>,
    F: FnMut(Option<E>) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<RetryConfigError>,
{
    let policy = options.into().validate()?;

    let mut attempts = 0;
    let mut last_failure = None;

    loop {
        let failure = match task(last_failure.take()).await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        attempts += 1;
        if policy.times.is_exhausted(attempts) {
            log::debug!("giving up after {} failed attempts", attempts);
            return Err(failure);
        }

        log::debug!(
            "attempt {} failed, retrying in {:?}",
            attempts,
            policy.interval
        );
        last_failure = Some(failure);

        if policy.interval.is_zero() {
            yield_now().await;
        } else {
            delay(policy.interval).await;
        }
    }
}

/// [`retry`] with the default policy: 5 attempts, no pause.
pub async fn retry_default<F, Fut, T, E>(task: F) -> Result<T, E>
where
    F: FnMut(Option<E>) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<RetryConfigError>,
{
    retry(RetryPolicy::default(), task).await
}
