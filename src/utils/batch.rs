use anyhow::Result;
use futures::future::join_all;
use std::future::Future;
use std::time::Duration;

/// Batch pacing options: chunk width and inter-chunk delay
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    pub concurrency: usize,
    pub delay: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrency: 5,
            delay: Duration::from_millis(100),
        }
    }
}

/// Process `items` in fixed-size chunks of `concurrency`.
///
/// Each chunk's calls run concurrently and the whole chunk is awaited before
/// the next starts; `delay` is slept between chunks and skipped after the
/// last. Results preserve input order regardless of completion order inside
/// a chunk. The first failure rejects the whole batch.
pub async fn process_batch<T, U, F, Fut>(
    items: Vec<T>,
    options: BatchOptions,
    processor: F,
) -> Result<Vec<U>>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<U>>,
{
    process_batch_with_progress(items, options, processor, |_, _| {}).await
}

/// `process_batch` with a progress callback, invoked after each chunk with
/// (processed so far, total).
pub async fn process_batch_with_progress<T, U, F, Fut, P>(
    items: Vec<T>,
    options: BatchOptions,
    mut processor: F,
    mut on_progress: P,
) -> Result<Vec<U>>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<U>>,
    P: FnMut(usize, usize),
{
    let total = items.len();
    let chunk_size = options.concurrency.max(1);
    let mut results = Vec::with_capacity(total);
    let mut remaining = items.into_iter().peekable();

    while remaining.peek().is_some() {
        let chunk: Vec<Fut> = remaining
            .by_ref()
            .take(chunk_size)
            .map(&mut processor)
            .collect();

        // Every member of the chunk runs to completion before a failure
        // rejects the batch; the first error (in input order) wins.
        let mut first_err = None;
        for outcome in join_all(chunk).await {
            match outcome {
                Ok(value) => results.push(value),
                Err(e) => {
                    if first_err.is_none() {
                        first_err = Some(e);
                    }
                }
            }
        }
        if let Some(e) = first_err {
            return Err(e);
        }
        on_progress(results.len(), total);

        if remaining.peek().is_some() && !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }
    }

    Ok(results)
}
