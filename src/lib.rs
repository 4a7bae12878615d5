//! Asynchronous control-flow combinators over fallible futures.
//!
//! Every combinator takes tasks, closures returning a `Future<Output = Result<T, E>>`, and is
//! itself a future that drives them when polled. Nothing is spawned: tasks run concurrently
//! inside the combinator's future, on whatever executor polls it.
//!
//! - [`series`] runs tasks one after another.
//! - [`parallel`] / [`parallel_limit`] run tasks with an optional bound on concurrency, and
//!   [`map`] / [`map_limit`] do the same for a function applied over a sequence.
//! - [`timeout`] adds a deadline to a computation.
//! - [`whilst`] / [`do_whilst`] loop a task while a predicate holds.
//! - [`retry`] calls a task until it succeeds or its attempt budget is spent.
//!
//! Timers come from the runtime selected with the `"tokio"` (default) or `"async-std"` feature.

pub mod defer;
pub mod delay;
pub mod error;
pub mod map;
pub mod parallel;
pub mod retry;
pub mod series;
pub mod timeout;
pub mod whilst;
mod yield_now;

pub use defer::{defer, Deferred, Promise, Resolver};
pub use delay::{delay, Delay};
pub use error::{Abandoned, RetryConfigError, TimeoutError};
pub use map::{map, map_limit};
pub use parallel::{parallel, parallel_limit, Parallel};
pub use retry::{retry, retry_default, RetryConfig, RetryOptions, RetryPolicy, Times};
pub use series::series;
pub use timeout::{timeout, Timeout, TimeoutExt};
pub use whilst::{do_whilst, whilst, Condition};
pub use yield_now::{yield_now, YieldNow};
