use std::future::Future;

use crate::parallel::Parallel;

/// Calls `iter(item, index)` for every item, one item at a time.
///
/// Same as [`map_limit`] with a limit of 1: the call for an item happens only after the future
/// returned for the previous item succeeded.
///
/// ```
/// # async fn doc_map() -> Result<(), std::convert::Infallible> {
/// use async_flow::map;
/// use futures::future::ready;
/// use std::convert::Infallible;
///
/// let labeled = map(vec!["a", "b", "c"], |v, i| {
///     ready(Ok::<_, Infallible>(format!("{}{}", v, i)))
/// })
/// .await?;
/// assert_eq!(labeled, ["a0", "b1", "c2"]);
/// # Ok(())
/// # }
/// ```
pub fn map<I, F, Fut, T, E>(items: I, iter: F) -> Parallel<impl Iterator<Item = Fut>, T>
where
    I: IntoIterator,
    F: FnMut(I::Item, usize) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    map_limit(items, iter, 1)
}

/// Calls `iter(item, index)` for every item, with up to `limit` calls in flight.
///
/// A `limit` of zero is raised to 1. The output is ordered like `items`. `iter` is called lazily,
/// each time the underlying [`Parallel`] future has room for one more task.
pub fn map_limit<I, F, Fut, T, E>(
    items: I,
    mut iter: F,
    limit: usize,
) -> Parallel<impl Iterator<Item = Fut>, T>
where
    I: IntoIterator,
    F: FnMut(I::Item, usize) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    // a limit at or above the item count already means full concurrency
    let limit = limit.max(1);
    let tasks = items
        .into_iter()
        .enumerate()
        .map(move |(index, item)| iter(item, index));

    Parallel::new(tasks, limit)
}
