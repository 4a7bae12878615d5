use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Future that hands control back to the executor once before completing.
///
/// This future is created by [`yield_now`] function.
#[must_use = "futures do nothing unless polled"]
#[derive(Debug, Default)]
pub struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context) -> Poll<Self::Output> {
        if self.yielded {
            return Poll::Ready(());
        }

        // reschedule ourselves so the executor gets a chance to run something else first
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// Creates a future that yields to the executor once.
///
/// The loops use it between iterations so that a long-running loop whose tasks complete
/// immediately does not monopolize the executor.
pub fn yield_now() -> YieldNow {
    YieldNow::default()
}
