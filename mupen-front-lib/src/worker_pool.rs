//! Bounded pool of tokio workers used for bulk ROM hashing.
//!
//! N persistent tasks pull items from a bounded `async-channel` (its
//! `Receiver` is `Clone`, so workers share it without a lock) and push
//! results into an unbounded mpsc channel. Dropping the pool stops
//! delivery; items still queued are abandoned.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Duration;

/// Per-item ceiling before a worker gives up on an item.
pub const DEFAULT_ITEM_TIMEOUT: Duration = Duration::from_secs(120);

/// A pool of worker tasks that process items concurrently.
///
/// ```ignore
/// let mut pool = WorkerPool::start(4, paths, |path| async move { hash(path).await });
/// while let Some(result) = pool.recv().await {
///     handle(result);
/// }
/// ```
pub struct WorkerPool<R: Send + 'static> {
    result_rx: mpsc::UnboundedReceiver<R>,
    _handles: Vec<JoinHandle<()>>,
}

impl<R: Send + 'static> WorkerPool<R> {
    /// Spawn `n` workers (at least one) and feed them `items`.
    pub fn start<W, F, Fut>(n: usize, items: Vec<W>, process_fn: F) -> Self
    where
        W: Send + 'static,
        F: Fn(W) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        Self::start_with_timeout(n, items, DEFAULT_ITEM_TIMEOUT, process_fn)
    }

    /// Like [`start`](Self::start) with an explicit per-item timeout. An item
    /// that times out produces no result.
    pub fn start_with_timeout<W, F, Fut>(
        n: usize,
        items: Vec<W>,
        item_timeout: Duration,
        process_fn: F,
    ) -> Self
    where
        W: Send + 'static,
        F: Fn(W) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        let n = n.max(1);
        let (work_tx, work_rx) = async_channel::bounded::<W>(n);
        let (result_tx, result_rx) = mpsc::unbounded_channel::<R>();
        let process_fn = Arc::new(process_fn);

        let handles: Vec<JoinHandle<()>> = (0..n)
            .map(|_| {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                let process_fn = process_fn.clone();
                tokio::spawn(async move {
                    while let Ok(item) = work_rx.recv().await {
                        match tokio::time::timeout(item_timeout, process_fn(item)).await {
                            Ok(r) => {
                                if result_tx.send(r).is_err() {
                                    break;
                                }
                            }
                            Err(_) => {
                                log::warn!(
                                    "Worker pool: item timed out after {}s, skipping",
                                    item_timeout.as_secs()
                                );
                            }
                        }
                    }
                })
            })
            .collect();

        // Closes the result channel once the last worker exits
        drop(result_tx);

        tokio::spawn(async move {
            for item in items {
                if work_tx.send(item).await.is_err() {
                    break;
                }
            }
        });

        Self {
            result_rx,
            _handles: handles,
        }
    }

    /// Next result, or `None` once every worker has finished.
    pub async fn recv(&mut self) -> Option<R> {
        self.result_rx.recv().await
    }

    /// Drain every remaining result (completion order).
    pub async fn collect(mut self) -> Vec<R> {
        let mut out = Vec::new();
        while let Some(r) = self.recv().await {
            out.push(r);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_item_processed() {
        let pool = WorkerPool::start(3, (1..=20).collect(), |x: u32| async move { x * 2 });
        let mut results = pool.collect().await;
        results.sort_unstable();
        assert_eq!(results, (1..=20).map(|x| x * 2).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_zero_workers_still_runs() {
        let pool = WorkerPool::start(0, vec![1u8, 2, 3], |x| async move { x });
        assert_eq!(pool.collect().await.len(), 3);
    }

    #[tokio::test]
    async fn test_timed_out_item_is_dropped() {
        let pool = WorkerPool::start_with_timeout(
            2,
            vec![0u64, 500, 0],
            Duration::from_millis(50),
            |ms| async move {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                ms
            },
        );
        assert_eq!(pool.collect().await, vec![0, 0]);
    }
}
