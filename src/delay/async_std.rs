use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

/// Future that completes once its duration has elapsed.
///
/// This future is created by [`delay`] function and available when `"async-std"` feature is
/// enabled. It runs on the async-io timer that async-std itself uses.
#[must_use = "futures do nothing unless polled"]
#[derive(Debug)]
pub struct Delay {
    inner: async_io::Timer,
}

impl Future for Delay {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context) -> Poll<Self::Output> {
        Pin::new(&mut self.inner).poll(cx).map(|_| ())
    }
}

/// Creates a future that completes after `duration` and never fails.
///
/// The deadline is fixed when this function is called, not when the future is first polled.
pub fn delay(duration: Duration) -> Delay {
    Delay {
        inner: async_io::Timer::after(duration),
    }
}
