use std::future::Future;

/// Runs the tasks one after another, collecting their values in order.
///
/// A task is invoked only once the previous one succeeded. The first failure is returned as-is
/// and the remaining tasks are never invoked.
pub async fn series<I, F, Fut, T, E>(tasks: I) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let tasks = tasks.into_iter();
    let mut results = Vec::with_capacity(tasks.size_hint().0);

    for (index, task) in tasks.enumerate() {
        log::trace!("running task {} in series", index);
        results.push(task().await?);
    }

    Ok(results)
}
