// these tests drive the tokio timer on a paused clock
#![cfg(feature = "tokio")]

use futures::future::ready;
use std::cell::{Cell, RefCell};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

use async_flow::{retry, retry_default, RetryConfig, RetryConfigError, RetryOptions, Times};

#[derive(Debug, PartialEq, Error)]
enum TestError {
    #[error("not done yet ({0})")]
    NotDone(u32),
    #[error(transparent)]
    Config(#[from] RetryConfigError),
}

// a task that fails until its `succeed_on`-th call
fn succeeding_on(
    calls: &Cell<u32>,
    succeed_on: u32,
) -> impl FnMut(Option<TestError>) -> futures::future::Ready<Result<u32, TestError>> + '_ {
    move |_| {
        calls.set(calls.get() + 1);
        let n = calls.get();
        ready(if n == succeed_on {
            Ok(n)
        } else {
            Err(TestError::NotDone(n))
        })
    }
}

#[tokio::test]
async fn test_retries_forever_and_resolves() {
    for config in [
        RetryConfig::from(-1i32),
        RetryConfig::from(f64::INFINITY),
        RetryConfig::from(Times::Unbounded),
        RetryConfig::from(RetryOptions::new().unbounded()),
    ] {
        let calls = Cell::new(0);

        assert_eq!(retry(config, succeeding_on(&calls, 3)).await, Ok(3));
        assert_eq!(calls.get(), 3, "with {:?}", config);
    }
}

#[tokio::test]
async fn test_rejects_with_last_failure() {
    let calls = Cell::new(0);

    let result = retry(3u32, succeeding_on(&calls, 4)).await;

    assert_eq!(result, Err(TestError::NotDone(3)));
    assert_eq!(calls.get(), 3);
}

#[tokio::test]
async fn test_zero_times_still_attempts_once() {
    let calls = Cell::new(0);

    let result = retry(0u32, succeeding_on(&calls, 2)).await;

    assert_eq!(result, Err(TestError::NotDone(1)));
    assert_eq!(calls.get(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_accepts_options() {
    for options in [
        RetryOptions::new().times(5.0).interval_ms(10.0),
        RetryOptions::new().times(5.0),
        RetryOptions::new(),
    ] {
        let calls = Cell::new(0);

        assert_eq!(
            retry(options, succeeding_on(&calls, 5)).await,
            Ok(5),
            "with {:?}",
            options
        );
    }
}

#[tokio::test]
async fn test_default_policy() {
    let calls = Cell::new(0);
    assert_eq!(retry_default(succeeding_on(&calls, 5)).await, Ok(5));

    let calls = Cell::new(0);
    assert_eq!(
        retry_default(succeeding_on(&calls, 6)).await,
        Err(TestError::NotDone(5))
    );
    assert_eq!(calls.get(), 5);
}

#[tokio::test]
async fn test_passes_previous_failure() {
    let seen = RefCell::new(Vec::new());
    let calls = Cell::new(0);

    let result = retry(3u32, |last: Option<TestError>| {
        seen.borrow_mut().push(last);
        calls.set(calls.get() + 1);
        ready(Err::<(), _>(TestError::NotDone(calls.get())))
    })
    .await;

    assert_eq!(result, Err(TestError::NotDone(3)));
    assert_eq!(
        *seen.borrow(),
        [
            None,
            Some(TestError::NotDone(1)),
            Some(TestError::NotDone(2))
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_waits_between_attempts() {
    let calls = Cell::new(0);
    let start = Instant::now();

    let options = RetryOptions::new()
        .times(3.0)
        .interval(Duration::from_millis(100));
    assert_eq!(retry(options, succeeding_on(&calls, 3)).await, Ok(3));

    // two pauses, none after the successful attempt
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(200), "{:?}", elapsed);
    assert!(elapsed < Duration::from_millis(300), "{:?}", elapsed);
}

#[tokio::test]
async fn test_no_parameters() {
    let calls = Cell::new(0);

    let result = retry(None::<u32>, succeeding_on(&calls, 1)).await;

    assert_eq!(result, Err(TestError::Config(RetryConfigError::NoParameters)));
    assert_eq!(result.unwrap_err().to_string(), "No parameters given");
    assert_eq!(calls.get(), 0);
}

#[tokio::test]
async fn test_infinite_interval() {
    let calls = Cell::new(0);

    let result = retry(
        RetryOptions::new().interval_ms(f64::INFINITY),
        succeeding_on(&calls, 1),
    )
    .await;

    assert_eq!(
        result.unwrap_err().to_string(),
        "'interval' may not be Infinity"
    );
    assert_eq!(calls.get(), 0);
}

#[tokio::test]
async fn test_unsupported_times() {
    let calls = Cell::new(0);

    let result = retry(f64::NAN, succeeding_on(&calls, 1)).await;
    assert_eq!(
        result.unwrap_err().to_string(),
        "Unsupported argument type for 'times': NaN"
    );

    let result = retry(RetryOptions::new().times(2.5), succeeding_on(&calls, 1)).await;
    assert_eq!(
        result.unwrap_err().to_string(),
        "Unsupported argument type for 'times': fraction"
    );

    assert_eq!(calls.get(), 0);
}

#[test]
fn test_validation_fills_defaults() {
    let policy = RetryConfig::from(RetryOptions::new()).validate().unwrap();
    assert_eq!(policy.times, Times::Limited(5));
    assert_eq!(policy.interval, Duration::ZERO);

    let policy = RetryConfig::from(RetryOptions::new().interval_ms(-20.0))
        .validate()
        .unwrap();
    assert_eq!(policy.interval, Duration::ZERO);

    let policy = RetryConfig::from(Some(7u32)).validate().unwrap();
    assert_eq!(policy.times, Times::Limited(7));
}
