use futures::future::FusedFuture;
use futures_intrusive::channel::shared::{
    oneshot_channel, ChannelReceiveFuture, OneshotReceiver, OneshotSender,
};
use pin_project::pin_project;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use crate::error::Abandoned;

/// A pending computation paired with the handle that settles it.
///
/// A deferred pair is created by [`defer`] function.
pub struct Deferred<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    pub promise: Promise<T, E>,
    pub resolver: Resolver<T, E>,
}

impl<T, E> Deferred<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Splits the pair into its promise and its resolver.
    pub fn split(self) -> (Promise<T, E>, Resolver<T, E>) {
        (self.promise, self.resolver)
    }
}

impl<T, E> fmt::Debug for Deferred<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Deferred").finish_non_exhaustive()
    }
}

/// Future resolving to whatever the connected [`Resolver`] settles it with.
///
/// If every resolver is dropped without settling, the promise fails with [`Abandoned`].
#[must_use = "futures do nothing unless polled"]
#[pin_project]
pub struct Promise<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    #[pin]
    inner: ChannelReceiveFuture<parking_lot::RawMutex, Result<T, E>>,
    // the channel closes once its last receiver is gone
    _receiver: OneshotReceiver<Result<T, E>>,
    settled: bool,
}

impl<T, E> Future for Promise<T, E>
where
    T: Send + 'static,
    E: From<Abandoned> + Send + 'static,
{
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context) -> Poll<Self::Output> {
        let this = self.project();
        assert!(!*this.settled, "promise polled after settlement");

        let outcome = futures::ready!(this.inner.poll(cx));
        *this.settled = true;

        Poll::Ready(match outcome {
            Some(outcome) => outcome,
            None => Err(Abandoned.into()),
        })
    }
}

impl<T, E> FusedFuture for Promise<T, E>
where
    T: Send + 'static,
    E: From<Abandoned> + Send + 'static,
{
    fn is_terminated(&self) -> bool {
        self.settled
    }
}

impl<T, E> fmt::Debug for Promise<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Promise")
            .field("settled", &self.settled)
            .finish_non_exhaustive()
    }
}

/// Settles the connected [`Promise`].
///
/// Only the first call to [`resolve`](Resolver::resolve) or [`reject`](Resolver::reject) across
/// all clones has an effect. Later calls drop their value and return `false`.
pub struct Resolver<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    sender: Arc<OneshotSender<Result<T, E>>>,
}

impl<T, E> Clone for Resolver<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T, E> Resolver<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Settles the promise with a value. Returns whether this call settled it.
    pub fn resolve(&self, value: T) -> bool {
        self.settle(Ok(value))
    }

    /// Settles the promise with a failure. Returns whether this call settled it.
    pub fn reject(&self, error: E) -> bool {
        self.settle(Err(error))
    }

    fn settle(&self, outcome: Result<T, E>) -> bool {
        // the oneshot channel refuses every value after the first one
        let settled = self.sender.send(outcome).is_ok();
        if !settled {
            log::trace!("ignoring settlement of an already settled promise");
        }
        settled
    }
}

impl<T, E> fmt::Debug for Resolver<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}

/// Creates a connected pair of [`Promise`] and [`Resolver`].
///
/// The promise can be awaited anywhere, including inside the other combinators of this crate,
/// while the resolver is handed to whatever code eventually produces the outcome. Both may
/// cross threads, so the value and failure types must be `Send + 'static`.
///
/// ```
/// # async fn doc_defer() {
/// use async_flow::defer;
///
/// let (promise, resolver) = defer::<u32, Box<dyn std::error::Error + Send + Sync>>().split();
///
/// resolver.resolve(42);
/// assert!(!resolver.reject("too late".into()));
///
/// assert_eq!(promise.await.unwrap(), 42);
/// # }
/// ```
pub fn defer<T, E>() -> Deferred<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    let (sender, receiver) = oneshot_channel();

    Deferred {
        promise: Promise {
            inner: receiver.receive(),
            _receiver: receiver,
            settled: false,
        },
        resolver: Resolver {
            sender: Arc::new(sender),
        },
    }
}
