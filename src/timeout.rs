use futures::future::{FusedFuture, OptionFuture};
use pin_project::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use crate::delay::{delay, Delay};
use crate::error::TimeoutError;

/// Future racing a computation against a timer.
///
/// This future is created by [`timeout`] function or [`TimeoutExt::timeout`].
#[must_use = "futures do nothing unless polled"]
#[pin_project]
pub struct Timeout<F> {
    #[pin]
    inner: OptionFuture<F>,
    #[pin]
    timer: OptionFuture<Delay>,
    budget: Duration,
    settled: bool,
}

impl<F, T, E> Future for Timeout<F>
where
    F: Future<Output = Result<T, E>>,
    E: From<TimeoutError>,
{
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context) -> Poll<Self::Output> {
        let mut this = self.project();
        assert!(!*this.settled, "timeout polled after settlement");

        // the computation wins ties, its outcome is already there
        if let Poll::Ready(Some(outcome)) = this.inner.as_mut().poll(cx) {
            *this.settled = true;
            // clear the timer so it can never fire for a settled computation
            this.timer.set(None.into());
            return Poll::Ready(outcome);
        }

        if let Poll::Ready(Some(())) = this.timer.as_mut().poll(cx) {
            log::debug!("deadline of {:?} elapsed", this.budget);
            *this.settled = true;
            // stop listening: any later settlement of the computation is discarded
            this.inner.set(None.into());
            return Poll::Ready(Err(TimeoutError::new(*this.budget).into()));
        }

        Poll::Pending
    }
}

impl<F, T, E> FusedFuture for Timeout<F>
where
    F: Future<Output = Result<T, E>>,
    E: From<TimeoutError>,
{
    fn is_terminated(&self) -> bool {
        self.settled
    }
}

/// Adds a deadline to a computation.
///
/// The returned future settles like `future` if it settles within `budget`, and fails with
/// [`TimeoutError`] (converted into `E`) otherwise. The timer starts when this function is
/// called, not when the returned future is first polled.
///
/// On expiry, `future` is dropped. Pass a [`Promise`] or a runtime's join handle to keep the
/// underlying work running past the deadline.
///
/// [`Promise`]: crate::defer::Promise
///
/// # Panics
/// With the `"tokio"` feature, panics when called outside of a tokio runtime.
pub fn timeout<F, T, E>(future: F, budget: Duration) -> Timeout<F>
where
    F: Future<Output = Result<T, E>>,
    E: From<TimeoutError>,
{
    Timeout {
        inner: Some(future).into(),
        timer: Some(delay(budget)).into(),
        budget,
        settled: false,
    }
}

/// Extends fallible futures with [`timeout`].
pub trait TimeoutExt: Future {
    fn timeout<T, E>(self, budget: Duration) -> Timeout<Self>
    where
        Self: Future<Output = Result<T, E>> + Sized,
        E: From<TimeoutError>,
    {
        timeout(self, budget)
    }
}

impl<F> TimeoutExt for F where F: Future {}
