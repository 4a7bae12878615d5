use pin_project::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

/// Future that completes once its duration has elapsed.
///
/// This future is created by [`delay`] function and available when `"tokio"` feature is enabled.
#[must_use = "futures do nothing unless polled"]
#[pin_project]
#[derive(Debug)]
pub struct Delay {
    #[pin]
    inner: ::tokio::time::Sleep,
}

impl Future for Delay {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context) -> Poll<Self::Output> {
        self.project().inner.poll(cx)
    }
}

/// Creates a future that completes after `duration` and never fails.
///
/// # Panics
/// Panics when called outside of a tokio runtime, as the timer is registered immediately.
pub fn delay(duration: Duration) -> Delay {
    Delay {
        inner: ::tokio::time::sleep(duration),
    }
}
