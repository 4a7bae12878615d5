use futures::future::FusedFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use pin_project::pin_project;

use std::fmt;
use std::future::Future;
use std::mem;
use std::pin::Pin;
use std::task::{Context, Poll};

// a running task tagged with its position in the task list
#[pin_project]
struct Indexed<Fut> {
    index: usize,
    #[pin]
    inner: Fut,
}

impl<Fut> Future for Indexed<Fut>
where
    Fut: Future,
{
    type Output = (usize, Fut::Output);

    fn poll(self: Pin<&mut Self>, cx: &mut Context) -> Poll<Self::Output> {
        let this = self.project();
        let index = *this.index;
        this.inner.poll(cx).map(|output| (index, output))
    }
}

/// Future running a list of tasks with a bound on how many are in flight at once.
///
/// This future is created by [`parallel`], [`parallel_limit`], [`map`] and [`map_limit`]
/// functions.
///
/// Tasks are produced by the underlying iterator: pulling an element out of it launches the
/// task, which happens only while this future is polled. Results are stored at the index of the
/// task that produced them, so the output order never depends on completion order.
///
/// [`map`]: crate::map()
/// [`map_limit`]: crate::map_limit()
#[must_use = "futures do nothing unless polled"]
pub struct Parallel<I, T>
where
    I: Iterator,
    I::Item: Future,
{
    tasks: I,
    running: FuturesUnordered<Indexed<I::Item>>,
    results: Vec<Option<T>>,
    limit: usize,
    settled: bool,
}

impl<I, T> Parallel<I, T>
where
    I: Iterator,
    I::Item: Future,
{
    /// Wraps a lazy iterator of tasks. A `limit` of zero means no limit.
    pub fn new(tasks: I, limit: usize) -> Self {
        let limit = if limit == 0 { usize::MAX } else { limit };

        Self {
            tasks,
            running: FuturesUnordered::new(),
            results: Vec::new(),
            limit,
            settled: false,
        }
    }

    // launch tasks until the limit is reached or the list is exhausted
    fn fill(&mut self) {
        while self.running.len() < self.limit {
            let task = match self.tasks.next() {
                Some(task) => task,
                None => break,
            };

            let index = self.results.len();
            self.results.push(None);
            log::trace!("launching task {} ({} in flight)", index, self.running.len() + 1);

            self.running.push(Indexed { index, inner: task });
        }
    }
}

// running tasks are pinned inside FuturesUnordered, nothing else is ever pinned
impl<I, T> Unpin for Parallel<I, T>
where
    I: Iterator,
    I::Item: Future,
{
}

impl<I, T, E> Future for Parallel<I, T>
where
    I: Iterator,
    I::Item: Future<Output = Result<T, E>>,
{
    type Output = Result<Vec<T>, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context) -> Poll<Self::Output> {
        let this = &mut *self;
        assert!(!this.settled, "parallel polled after settlement");

        loop {
            this.fill();

            match futures::ready!(this.running.poll_next_unpin(cx)) {
                Some((index, Ok(value))) => {
                    debug_assert!(this.results[index].is_none());
                    this.results[index] = Some(value);
                }
                Some((index, Err(e))) => {
                    log::debug!(
                        "task {} failed, abandoning {} running tasks",
                        index,
                        this.running.len()
                    );
                    this.settled = true;
                    this.running.clear();
                    return Poll::Ready(Err(e));
                }
                None => {
                    // nothing running after a fill means the list is exhausted
                    this.settled = true;
                    let results = mem::take(&mut this.results)
                        .into_iter()
                        .map(|slot| slot.expect("every launched task stored its result"))
                        .collect();
                    return Poll::Ready(Ok(results));
                }
            }
        }
    }
}

impl<I, T, E> FusedFuture for Parallel<I, T>
where
    I: Iterator,
    I::Item: Future<Output = Result<T, E>>,
{
    fn is_terminated(&self) -> bool {
        self.settled
    }
}

impl<I, T> fmt::Debug for Parallel<I, T>
where
    I: Iterator,
    I::Item: Future,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Parallel")
            .field("launched", &self.results.len())
            .field("running", &self.running.len())
            .field("limit", &self.limit)
            .field("settled", &self.settled)
            .finish()
    }
}

/// Runs every task concurrently.
///
/// Resolves to the values of all tasks, in task order, once every task succeeded, or to the first
/// failure. Tasks are launched on the first poll, not by this function. After a failure, no
/// further task is launched and the running ones are dropped.
///
/// ```
/// # async fn doc_parallel() -> Result<(), std::convert::Infallible> {
/// use async_flow::parallel;
/// use futures::future::{ready, BoxFuture, FutureExt};
/// use std::convert::Infallible;
///
/// let tasks: Vec<Box<dyn FnOnce() -> BoxFuture<'static, Result<&'static str, Infallible>>>> = vec![
///     Box::new(|| ready(Ok::<_, Infallible>("a")).boxed()),
///     Box::new(|| async { Ok::<_, Infallible>("b") }.boxed()),
/// ];
///
/// assert_eq!(parallel(tasks).await?, ["a", "b"]);
/// # Ok(())
/// # }
/// ```
pub fn parallel<I, F, Fut, T, E>(tasks: I) -> Parallel<impl Iterator<Item = Fut>, T>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    parallel_limit(tasks, 0)
}

/// Runs the tasks with at most `limit` of them in flight at once.
///
/// A `limit` of zero, or one not smaller than the number of tasks, is the same as
/// [`parallel`]. Whenever a task succeeds, the next task of the list is launched. The output
/// is ordered like the task list regardless of the order in which tasks complete.
pub fn parallel_limit<I, F, Fut, T, E>(
    tasks: I,
    limit: usize,
) -> Parallel<impl Iterator<Item = Fut>, T>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    Parallel::new(tasks.into_iter().map(|task| task()), limit)
}
