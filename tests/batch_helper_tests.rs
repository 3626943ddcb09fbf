use anyhow::anyhow;
use dealtrack::utils::{process_batch, process_batch_with_progress, BatchOptions};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn opts(concurrency: usize, delay_ms: u64) -> BatchOptions {
    BatchOptions {
        concurrency,
        delay: Duration::from_millis(delay_ms),
    }
}

#[tokio::test]
async fn test_results_preserve_input_order() {
    let result = process_batch(vec![1, 2, 3, 4, 5], opts(2, 0), |x| async move { Ok(x * 2) })
        .await
        .unwrap();
    assert_eq!(result, vec![2, 4, 6, 8, 10]);
}

#[tokio::test]
async fn test_order_holds_when_later_items_finish_first() {
    // first item of each chunk sleeps longest
    let result = process_batch(vec![30u64, 1, 20, 1, 10], opts(2, 0), |ms| async move {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok(ms)
    })
    .await
    .unwrap();
    assert_eq!(result, vec![30, 1, 20, 1, 10]);
}

#[tokio::test]
async fn test_chunk_members_run_concurrently() {
    // 4 items x 30ms at concurrency 4 must take well under 4 x 30ms
    let start = std::time::Instant::now();
    process_batch(vec![(); 4], opts(4, 0), |_| async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        Ok(())
    })
    .await
    .unwrap();
    assert!(start.elapsed() < Duration::from_millis(100));
}

#[tokio::test]
async fn test_progress_reported_after_each_chunk() {
    let mut reports = Vec::new();
    process_batch_with_progress(
        vec![1, 2, 3, 4, 5],
        opts(2, 0),
        |x| async move { Ok(x) },
        |done, total| reports.push((done, total)),
    )
    .await
    .unwrap();
    assert_eq!(reports, vec![(2, 5), (4, 5), (5, 5)]);
}

#[tokio::test]
async fn test_delay_skipped_after_final_chunk() {
    let start = std::time::Instant::now();
    // 2 chunks -> exactly one inter-chunk delay
    process_batch(vec![1, 2, 3], opts(2, 40), |x| async move { Ok(x) })
        .await
        .unwrap();
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(40));
    assert!(elapsed < Duration::from_millis(80));
}

#[tokio::test]
async fn test_failure_rejects_the_batch() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&attempts);
    let result = process_batch(vec![1, 2, 3, 4, 5, 6], opts(2, 0), move |x| {
        let seen = Arc::clone(&seen);
        async move {
            seen.fetch_add(1, Ordering::SeqCst);
            if x == 3 {
                Err(anyhow!("item {} exploded", x))
            } else {
                Ok(x)
            }
        }
    })
    .await;

    assert!(result.is_err());
    // chunk 2 started, chunk 3 never did
    assert_eq!(attempts.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_whole_chunk_runs_before_failure_rejects() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&attempts);
    // the first member fails immediately; its chunk-mates still run
    let result: anyhow::Result<Vec<u64>> =
        process_batch(vec![0u64, 15, 15], opts(3, 0), move |ms| {
            let seen = Arc::clone(&seen);
            async move {
                if ms == 0 {
                    Err(anyhow!("item {} exploded", ms))
                } else {
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                    seen.fetch_add(1, Ordering::SeqCst);
                    Ok(ms)
                }
            }
        })
        .await;

    assert!(result.is_err());
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_first_error_in_input_order_wins() {
    let result: anyhow::Result<Vec<i32>> =
        process_batch(vec![1, 2], opts(2, 0), |x| async move {
            Err(anyhow!("item {} exploded", x))
        })
        .await;
    assert!(result.unwrap_err().to_string().contains("item 1"));
}

#[tokio::test]
async fn test_empty_input() {
    let result: Vec<i32> = process_batch(Vec::<i32>::new(), opts(3, 10), |x| async move { Ok(x) })
        .await
        .unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_concurrency_wider_than_input() {
    let result = process_batch(vec![1, 2], opts(10, 50), |x| async move { Ok(x + 1) })
        .await
        .unwrap();
    assert_eq!(result, vec![2, 3]);
}
