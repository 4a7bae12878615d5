use std::cell::Cell;
use std::time::Duration;

use async_flow::{delay, map_limit, retry, timeout, whilst, RetryOptions, TimeoutError};

type Error = Box<dyn std::error::Error + Send + Sync>;

// pretend to download something, slower for longer names
async fn fetch(name: &str) -> Result<usize, Error> {
    delay(Duration::from_millis(100 * name.len() as u64)).await;
    Ok(name.len())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // at most two downloads in flight, results come back in input order
    let names = ["a", "abc", "ab", "abcd"];
    let sizes = map_limit(
        names,
        |name, index| async move {
            println!("fetching #{} ({})", index, name);
            fetch(name).await
        },
        2,
    )
    .await?;
    println!("sizes: {:?}", sizes);

    // the slowest download does not fit in the budget
    match timeout(fetch("abcdefghij"), Duration::from_millis(500)).await {
        Ok(size) => println!("fetched {} bytes in time", size),
        Err(e) if e.is::<TimeoutError>() => println!("gave up: {}", e),
        Err(e) => return Err(e),
    }

    // a flaky operation that needs a few attempts
    let mut attempts = 0;
    let value = retry(
        RetryOptions::new().times(5.0).interval(Duration::from_millis(200)),
        |last_failure| {
            attempts += 1;
            if let Some(e) = last_failure {
                println!("attempt {} after failure: {}", attempts, e);
            }
            let attempt = attempts;
            async move {
                if attempt < 3 {
                    Err(Error::from("service unavailable"))
                } else {
                    Ok(attempt * 10)
                }
            }
        },
    )
    .await?;
    println!("retry succeeded with {}", value);

    // poll until a counter reaches its target
    let polls = Cell::new(0);
    let last = whilst(
        || polls.get() < 3,
        || {
            polls.set(polls.get() + 1);
            let seen = polls.get();
            async move { Ok::<_, Error>(seen) }
        },
    )
    .await?;
    println!("last poll: {:?}", last);

    Ok(())
}
