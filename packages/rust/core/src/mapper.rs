//! Bounded concurrent mapping primitive.
//!
//! One reusable fan-out used by every concurrent phase of the
//! pipeline: builder discovery, config-variant resolution, and
//! per-document rendering each call [`map_bounded`] with their own
//! worker limit instead of building an ad hoc pool.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use datacat_shared::{DatacatError, Result};

/// Apply a fallible async transform to every input with at most
/// `limit` transforms in flight.
///
/// Outputs are returned in input order: `output[i]` corresponds to
/// `input[i]` regardless of completion order. The batch is fail-fast —
/// the first transform error (or worker panic) aborts the remaining
/// tasks and propagates, so callers can always distinguish a complete
/// batch from a partial one.
///
/// A `limit` of zero is treated as one.
pub async fn map_bounded<I, O, F, Fut>(inputs: Vec<I>, limit: usize, transform: F) -> Result<Vec<O>>
where
    I: Send + 'static,
    O: Send + 'static,
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O>> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let transform = Arc::new(transform);

    let handles: Vec<JoinHandle<Result<O>>> = inputs
        .into_iter()
        .map(|input| {
            let semaphore = semaphore.clone();
            let transform = transform.clone();
            tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
                transform(input).await
            })
        })
        .collect();

    // Awaiting handles in spawn order re-imposes input order on the
    // results no matter which workers finished first.
    let mut outputs = Vec::with_capacity(handles.len());
    let mut handles = handles.into_iter();
    while let Some(handle) = handles.next() {
        let result = match handle.await {
            Ok(result) => result,
            Err(join_err) => Err(DatacatError::Task(join_err.to_string())),
        };
        match result {
            Ok(output) => outputs.push(output),
            Err(e) => {
                for rest in handles.by_ref() {
                    rest.abort();
                }
                return Err(e);
            }
        }
    }

    Ok(outputs)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn preserves_input_order_under_reversed_completion() {
        // Later inputs sleep less, so they complete first.
        let inputs: Vec<u64> = (0..8).collect();
        let outputs = map_bounded(inputs, 8, |i| async move {
            tokio::time::sleep(Duration::from_millis((8 - i) * 10)).await;
            Ok(i * 2)
        })
        .await
        .unwrap();

        assert_eq!(outputs, vec![0, 2, 4, 6, 8, 10, 12, 14]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn never_exceeds_worker_limit() {
        const LIMIT: usize = 3;
        const BATCH: usize = 16;

        let active = Arc::new(AtomicUsize::new(0));
        let max_active = Arc::new(AtomicUsize::new(0));

        let outputs = {
            let active = active.clone();
            let max_active = max_active.clone();
            map_bounded((0..BATCH).collect(), LIMIT, move |i: usize| {
                let active = active.clone();
                let max_active = max_active.clone();
                async move {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    max_active.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                    Ok(i)
                }
            })
            .await
            .unwrap()
        };

        assert_eq!(outputs.len(), BATCH);
        assert!(
            max_active.load(Ordering::SeqCst) <= LIMIT,
            "observed {} concurrent workers with limit {LIMIT}",
            max_active.load(Ordering::SeqCst)
        );
    }

    #[tokio::test]
    async fn transforms_every_input_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let outputs = {
            let calls = calls.clone();
            map_bounded((0..25).collect::<Vec<i32>>(), 4, move |i| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(i)
                }
            })
            .await
            .unwrap()
        };

        assert_eq!(outputs.len(), 25);
        assert_eq!(calls.load(Ordering::SeqCst), 25);
    }

    #[tokio::test]
    async fn first_failure_aborts_the_batch() {
        let result = map_bounded((0..10).collect::<Vec<u32>>(), 2, |i| async move {
            if i == 3 {
                Err(DatacatError::not_found("broken_dataset"))
            } else {
                Ok(i)
            }
        })
        .await;

        let err = result.unwrap_err();
        assert!(
            matches!(err, DatacatError::NotFound { ref name } if name == "broken_dataset"),
            "error lost its identity: {err}"
        );
    }

    #[tokio::test]
    async fn worker_panic_surfaces_as_task_error() {
        let result = map_bounded(vec![1u32], 1, |i| async move {
            if i == 1 {
                panic!("boom");
            }
            Ok(i)
        })
        .await;

        assert!(matches!(result.unwrap_err(), DatacatError::Task(_)));
    }

    #[tokio::test]
    async fn empty_input_yields_empty_output() {
        let outputs: Vec<u32> = map_bounded(Vec::<u32>::new(), 4, |i| async move { Ok(i) })
            .await
            .unwrap();
        assert!(outputs.is_empty());
    }

    #[tokio::test]
    async fn zero_limit_is_clamped_to_one() {
        let outputs = map_bounded(vec![1, 2, 3], 0, |i| async move { Ok(i) })
            .await
            .unwrap();
        assert_eq!(outputs, vec![1, 2, 3]);
    }
}
