#![cfg(all(feature = "async-std", not(feature = "tokio")))]

use futures::executor::block_on;
use futures::future::pending;
use std::time::{Duration, Instant};

use async_flow::{delay, retry, timeout, RetryConfigError, RetryOptions, TimeoutError};

#[derive(Debug, PartialEq, thiserror::Error)]
enum TestError {
    #[error("not done yet")]
    NotDone,
    #[error(transparent)]
    Timeout(#[from] TimeoutError),
    #[error(transparent)]
    Config(#[from] RetryConfigError),
}

#[test]
fn test_delay() {
    let start = Instant::now();

    block_on(delay(Duration::from_millis(50)));

    assert!(start.elapsed() >= Duration::from_millis(50));
}

#[test]
fn test_delay_is_armed_on_creation() {
    let timer = delay(Duration::from_millis(300));
    std::thread::sleep(Duration::from_millis(300));

    let start = Instant::now();
    block_on(timer);

    assert!(start.elapsed() < Duration::from_millis(150), "{:?}", start.elapsed());
}

#[test]
fn test_timeout_budget_starts_at_call() {
    let wrapped = timeout(pending::<Result<(), TestError>>(), Duration::from_millis(300));
    std::thread::sleep(Duration::from_millis(300));

    let start = Instant::now();
    let result = block_on(wrapped);

    assert!(matches!(result, Err(TestError::Timeout(_))));
    assert!(start.elapsed() < Duration::from_millis(150), "{:?}", start.elapsed());
}

#[test]
fn test_retry_interval() {
    let start = Instant::now();
    let mut calls = 0;

    let result = block_on(retry(
        RetryOptions::new().times(3.0).interval(Duration::from_millis(50)),
        |_| {
            calls += 1;
            futures::future::ready(Err::<(), _>(TestError::NotDone))
        },
    ));

    assert_eq!(result, Err(TestError::NotDone));
    assert_eq!(calls, 3);
    assert!(start.elapsed() >= Duration::from_millis(100));
}
