use std::future::Future;

use crate::yield_now::yield_now;

/// Outcome of a loop predicate.
///
/// Implemented for `bool`, a predicate that cannot fail, and for `Result<bool, E>`, a predicate
/// whose failure ends the loop.
pub trait Condition<E> {
    fn evaluate(self) -> Result<bool, E>;
}

impl<E> Condition<E> for bool {
    fn evaluate(self) -> Result<bool, E> {
        Ok(self)
    }
}

impl<E> Condition<E> for Result<bool, E> {
    fn evaluate(self) -> Result<bool, E> {
        self
    }
}

/// Calls `task` while `test` holds, resolving to the value of the last call.
///
/// `test` is evaluated before every call, so `task` may not run at all, in which case the loop
/// resolves to `None`. A failure of `task` or of `test` ends the loop immediately. The loop
/// yields to the executor between iterations.
pub async fn whilst<P, C, F, Fut, T, E>(mut test: P, mut task: F) -> Result<Option<T>, E>
where
    P: FnMut() -> C,
    C: Condition<E>,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut last = None;
    let mut iterations = 0usize;

    while Condition::<E>::evaluate(test())? {
        last = Some(task().await?);
        iterations += 1;
        yield_now().await;
    }

    log::trace!("loop finished after {} iterations", iterations);
    Ok(last)
}

/// Calls `task` once, then again while `test` holds, resolving to the value of the last call.
///
/// Unlike [`whilst`], `test` is first consulted after the first call.
pub async fn do_whilst<F, Fut, P, C, T, E>(task: F, mut test: P) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: FnMut() -> C,
    C: Condition<E>,
{
    let mut first = true;
    let gated = move || {
        if first {
            first = false;
            Ok(true)
        } else {
            Condition::<E>::evaluate(test())
        }
    };

    match whilst(gated, task).await? {
        Some(last) => Ok(last),
        None => unreachable!("the first evaluation always runs the task"),
    }
}
