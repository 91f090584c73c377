//! Bounded worker pool for reconciliation work.
//!
//! Work items are blocking closures (registry calls may wait on storage or
//! consensus), so each attempt runs on tokio's blocking pool while a
//! semaphore caps how many run at once. `submit` never blocks and can be
//! called from any thread, including a configuration source's delivery
//! thread.
//!
//! No ordering is kept between work items, including items for the same
//! subject.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use netres_reconcile::FailurePolicy;
use tokio::runtime::Handle;
use tokio::sync::{watch, Semaphore};
use tracing::{debug, error, warn, Instrument, Span};

/// Default number of concurrently running work items.
pub const DEFAULT_WORKERS: usize = 4;

type WorkItem = Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

/// Configuration for the dispatch pool.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Maximum number of work items running at once.
    pub workers: usize,

    /// What to do with work items that return an error.
    pub failure_policy: FailurePolicy,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            failure_policy: FailurePolicy::LogAndDrop,
        }
    }
}

/// Dispatch statistics.
#[derive(Debug, Default)]
pub struct DispatchStats {
    /// Work items accepted by `submit`.
    pub submitted: AtomicU64,
    /// Work items that eventually returned `Ok`.
    pub succeeded: AtomicU64,
    /// Work items dropped after returning `Err`.
    pub failed: AtomicU64,
    /// Work items that panicked.
    pub panicked: AtomicU64,
    /// Retry attempts scheduled by the failure policy.
    pub retried: AtomicU64,
}

/// Bounded, fire-and-forget worker pool.
pub struct DispatchPool {
    runtime: Handle,
    permits: Arc<Semaphore>,
    policy: FailurePolicy,
    in_flight: Arc<watch::Sender<usize>>,
    stats: Arc<DispatchStats>,
    span: Span,
}

impl DispatchPool {
    /// Create a pool that runs work on `runtime`, logging inside `span`.
    pub fn new(runtime: Handle, config: DispatchConfig, span: Span) -> Self {
        let (in_flight, _) = watch::channel(0usize);
        Self {
            runtime,
            permits: Arc::new(Semaphore::new(config.workers.max(1))),
            policy: config.failure_policy,
            in_flight: Arc::new(in_flight),
            stats: Arc::new(DispatchStats::default()),
            span,
        }
    }

    /// Submit a work item.
    ///
    /// Errors go through the failure policy. Panics are logged and the item
    /// is dropped; they never reach the caller and are never retried.
    pub fn submit<F>(&self, name: &'static str, work: F)
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.stats.submitted.fetch_add(1, Ordering::Relaxed);
        let guard = InFlightGuard::enter(Arc::clone(&self.in_flight));

        let work: WorkItem = Arc::new(work);
        let permits = Arc::clone(&self.permits);
        let policy = self.policy.clone();
        let stats = Arc::clone(&self.stats);

        self.runtime.spawn(
            async move {
                run_work_item(name, work, permits, policy, stats).await;
                drop(guard);
            }
            .instrument(self.span.clone()),
        );
    }

    /// Wait until no work items are queued or running.
    pub async fn wait_idle(&self) {
        let mut rx = self.in_flight.subscribe();
        let _ = rx.wait_for(|n| *n == 0).await;
    }

    /// Number of work items queued or running.
    pub fn in_flight(&self) -> usize {
        *self.in_flight.borrow()
    }

    /// Get dispatch statistics.
    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }
}

/// Keeps the in-flight count accurate even if the task is dropped unrun.
struct InFlightGuard(Arc<watch::Sender<usize>>);

impl InFlightGuard {
    fn enter(counter: Arc<watch::Sender<usize>>) -> Self {
        counter.send_modify(|n| *n += 1);
        Self(counter)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.send_modify(|n| *n = n.saturating_sub(1));
    }
}

async fn run_work_item(
    name: &'static str,
    work: WorkItem,
    permits: Arc<Semaphore>,
    policy: FailurePolicy,
    stats: Arc<DispatchStats>,
) {
    let mut retry: u32 = 0;

    loop {
        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            warn!(work = name, "Dispatch pool closed, dropping work item");
            return;
        };

        let attempt = tokio::task::spawn_blocking({
            let work = Arc::clone(&work);
            move || work()
        })
        .await;
        drop(permit);

        match attempt {
            Ok(Ok(())) => {
                stats.succeeded.fetch_add(1, Ordering::Relaxed);
                debug!(work = name, retry, "Work item completed");
                return;
            }
            Ok(Err(e)) => {
                retry += 1;
                match policy.retry_delay(retry) {
                    Some(delay) => {
                        stats.retried.fetch_add(1, Ordering::Relaxed);
                        warn!(
                            work = name,
                            retry,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "Work item failed, retrying"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    None => {
                        stats.failed.fetch_add(1, Ordering::Relaxed);
                        error!(work = name, error = ?e, "Work item failed");
                        return;
                    }
                }
            }
            Err(join_error) => {
                stats.panicked.fetch_add(1, Ordering::Relaxed);
                error!(work = name, error = %join_error, "Work item panicked");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use netres_reconcile::Backoff;

    fn pool(config: DispatchConfig) -> DispatchPool {
        DispatchPool::new(Handle::current(), config, Span::none())
    }

    #[test]
    fn test_dispatch_config_default() {
        let config = DispatchConfig::default();
        assert_eq!(config.workers, DEFAULT_WORKERS);
        assert_eq!(config.failure_policy, FailurePolicy::LogAndDrop);
    }

    #[tokio::test]
    async fn test_runs_work_items() {
        let pool = pool(DispatchConfig::default());
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..10 {
            let counter = Arc::clone(&counter);
            pool.submit("count", move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }
        pool.wait_idle().await;

        assert_eq!(counter.load(Ordering::SeqCst), 10);
        assert_eq!(pool.stats().succeeded.load(Ordering::Relaxed), 10);
        assert_eq!(pool.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_log_and_drop_does_not_retry() {
        let pool = pool(DispatchConfig::default());
        let attempts = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&attempts);
        pool.submit("fail", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("registry unavailable")
        });
        pool.wait_idle().await;

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(pool.stats().failed.load(Ordering::Relaxed), 1);
        assert_eq!(pool.stats().retried.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_retry_with_backoff() {
        let pool = pool(DispatchConfig {
            workers: 1,
            failure_policy: FailurePolicy::RetryWithBackoff(Backoff {
                initial: Duration::from_millis(1),
                max: Duration::from_millis(5),
                max_retries: 3,
            }),
        });
        let attempts = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&attempts);
        pool.submit("flaky", move || {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                anyhow::bail!("not yet");
            }
            Ok(())
        });
        pool.wait_idle().await;

        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert_eq!(pool.stats().retried.load(Ordering::Relaxed), 2);
        assert_eq!(pool.stats().succeeded.load(Ordering::Relaxed), 1);
        assert_eq!(pool.stats().failed.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_retries_exhausted() {
        let pool = pool(DispatchConfig {
            workers: 1,
            failure_policy: FailurePolicy::RetryWithBackoff(Backoff {
                initial: Duration::from_millis(1),
                max: Duration::from_millis(1),
                max_retries: 2,
            }),
        });
        let attempts = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&attempts);
        pool.submit("broken", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("always")
        });
        pool.wait_idle().await;

        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert_eq!(pool.stats().failed.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let pool = pool(DispatchConfig {
            workers: 1,
            failure_policy: FailurePolicy::RetryWithBackoff(Backoff::default()),
        });
        let ran_after = Arc::new(AtomicUsize::new(0));

        pool.submit("panics", || panic!("boom"));
        let counter = Arc::clone(&ran_after);
        pool.submit("after", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        pool.wait_idle().await;

        assert_eq!(pool.stats().panicked.load(Ordering::Relaxed), 1);
        assert_eq!(pool.stats().retried.load(Ordering::Relaxed), 0);
        assert_eq!(ran_after.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let pool = pool(DispatchConfig {
            workers: 2,
            failure_policy: FailurePolicy::LogAndDrop,
        });
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        for _ in 0..8 {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            pool.submit("slow", move || {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(10));
                running.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            });
        }
        pool.wait_idle().await;

        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(pool.stats().succeeded.load(Ordering::Relaxed), 8);
    }

    #[test]
    fn test_submit_from_non_runtime_thread() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let pool = DispatchPool::new(
            runtime.handle().clone(),
            DispatchConfig::default(),
            Span::none(),
        );
        let counter = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&counter);
        std::thread::scope(|s| {
            s.spawn(|| {
                pool.submit("from_thread", move || {
                    c.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                });
            });
        });
        runtime.block_on(pool.wait_idle());

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
