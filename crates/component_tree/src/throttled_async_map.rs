use futures::future::{Future, FutureExt};
use tokio::task::{JoinError, JoinSet};

/// Run a function on each input as a spawned task, with a limit on the number
/// of tasks running concurrently.
///
/// Outputs are returned in input order, regardless of the order in which the
/// tasks complete. Dropping the returned future aborts all outstanding tasks.
pub async fn throttled_async_map<T, OutFuture, R>(
    // The maximum number of tasks to run concurrently.
    async_throttle_limit: usize,
    // The inputs to run the function on.
    inputs: Vec<T>,
    // Builds the task for one input.
    result_processor: impl Fn(T) -> OutFuture,
) -> Result<Vec<R>, JoinError>
where
    OutFuture: Send + 'static + Future<Output = R>,
    R: Send + 'static,
{
    let total = inputs.len();
    if total == 0 {
        return Ok(vec![]);
    }
    let limit = async_throttle_limit.clamp(1, total);

    let mut pending = inputs.into_iter().enumerate();
    let mut join_set: JoinSet<(usize, R)> = JoinSet::new();
    // spawn the initial tasks
    for (i, input) in pending.by_ref().take(limit) {
        join_set.spawn(result_processor(input).map(move |v| (i, v)));
    }

    // wait for the next task to finish to spawn a new one, while
    // accumulating outputs at their input index.
    let mut output: Vec<Option<R>> = (0..total).map(|_| None).collect();
    while let Some(joined) = join_set.join_next().await {
        let (result_i, result_value) = match joined {
            Err(e) => {
                // abort all outstanding futures
                join_set.abort_all();
                return Err(e);
            }
            Ok(v) => v,
        };
        output[result_i] = Some(result_value);

        if let Some((i, input)) = pending.next() {
            join_set.spawn(result_processor(input).map(move |v| (i, v)));
        }
    }

    Ok(output.into_iter().flatten().collect())
}
