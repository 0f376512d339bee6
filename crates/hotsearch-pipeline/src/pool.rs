use std::future::Future;
use std::sync::Arc;

use hotsearch_core::PoolSizing;
use tokio::sync::Semaphore;

/// How a submitted task was run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Handed to a background worker.
    Spawned,
    /// The pool was saturated, so the submitting caller ran it to completion.
    RanInline,
}

/// Bounded background executor for warmups, cleanups and classification
/// passes.
///
/// At most `max_workers` tasks run at once and at most `queue_capacity` more
/// wait for a worker. A submission beyond that runs on the caller.
#[derive(Debug, Clone)]
pub struct BackgroundPool {
    workers: Arc<Semaphore>,
    slots: Arc<Semaphore>,
    sizing: PoolSizing,
}

impl BackgroundPool {
    #[must_use]
    pub fn new(sizing: PoolSizing) -> Self {
        Self {
            workers: Arc::new(Semaphore::new(sizing.max_workers)),
            slots: Arc::new(Semaphore::new(sizing.max_workers + sizing.queue_capacity)),
            sizing,
        }
    }

    #[must_use]
    pub fn sizing(&self) -> PoolSizing {
        self.sizing
    }

    /// Tasks currently running or waiting for a worker.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.sizing.max_workers + self.sizing.queue_capacity - self.slots.available_permits()
    }

    /// Runs `task` on a background worker, or inline when every worker and
    /// queue slot is taken.
    ///
    /// The task owns its error handling; a panic inside a spawned task is
    /// contained to that task.
    pub async fn submit<F>(&self, task: F) -> Submission
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Ok(slot) = Arc::clone(&self.slots).try_acquire_owned() else {
            tracing::warn!(
                max_workers = self.sizing.max_workers,
                queue_capacity = self.sizing.queue_capacity,
                "pool: saturated, running task on caller"
            );
            task.await;
            return Submission::RanInline;
        };

        let workers = Arc::clone(&self.workers);
        tokio::spawn(async move {
            let _slot = slot;
            // The semaphore is never closed.
            let Ok(_worker) = workers.acquire_owned().await else {
                return;
            };
            task.await;
        });
        Submission::Spawned
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tokio::sync::Notify;

    use super::*;

    fn sizing(max_workers: usize, queue_capacity: usize) -> PoolSizing {
        PoolSizing {
            max_workers,
            queue_capacity,
        }
    }

    #[tokio::test]
    async fn spawned_tasks_run_in_background() {
        let pool = BackgroundPool::new(sizing(2, 2));
        let done = Arc::new(Notify::new());
        let signal = Arc::clone(&done);

        let submission = pool
            .submit(async move {
                signal.notify_one();
            })
            .await;

        assert_eq!(submission, Submission::Spawned);
        tokio::time::timeout(Duration::from_secs(1), done.notified())
            .await
            .expect("task ran");
    }

    #[tokio::test]
    async fn saturated_pool_runs_on_caller() {
        let pool = BackgroundPool::new(sizing(1, 1));
        let release = Arc::new(Notify::new());
        for _ in 0..2 {
            let release = Arc::clone(&release);
            let submission = pool
                .submit(async move {
                    release.notified().await;
                })
                .await;
            assert_eq!(submission, Submission::Spawned);
        }
        assert_eq!(pool.in_flight(), 2);

        let ran = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ran);
        let submission = pool
            .submit(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        assert_eq!(submission, Submission::RanInline);
        assert_eq!(ran.load(Ordering::SeqCst), 1);
        release.notify_waiters();
    }

    #[tokio::test]
    async fn slots_free_up_after_completion() {
        let pool = BackgroundPool::new(sizing(1, 0));
        let done = Arc::new(Notify::new());
        let signal = Arc::clone(&done);
        pool.submit(async move { signal.notify_one() }).await;
        done.notified().await;

        // Give the worker a moment to drop its permits.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(pool.in_flight(), 0);
        assert_eq!(pool.submit(async {}).await, Submission::Spawned);
    }
}
