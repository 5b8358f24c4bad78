use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::provider::Credentials;

use super::task_executor::TaskExecutor;
use super::types::{Outcome, Task};

/// Execute a batch of tasks concurrently and wait for every one of them.
///
/// All executions are started up front; with `max_parallel` set, a
/// semaphore bounds how many are in flight. The executor never fails, so
/// this never short-circuits. Outcomes come back in input order.
pub async fn execute_batch<'a, I>(
    tasks: I,
    executor: &TaskExecutor,
    credentials: &Credentials,
    max_parallel: Option<usize>,
) -> Vec<Outcome>
where
    I: IntoIterator<Item = &'a Task>,
{
    let tasks: Vec<&Task> = tasks.into_iter().collect();
    if tasks.is_empty() {
        return Vec::new();
    }

    let limit = max_parallel.unwrap_or(tasks.len()).max(1);
    let sem = Semaphore::new(limit);

    let futs = tasks.into_iter().map(|task| {
        let sem = &sem;
        async move {
            // The semaphore is never closed; a failed acquire just means no throttling.
            let _permit = sem.acquire().await.ok();
            executor.execute(task, credentials).await
        }
    });

    join_all(futs).await
}
