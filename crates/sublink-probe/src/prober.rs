//! Concurrent prober — bounded fan-out over the selectable records.
//!
//! Each URL is one spawned task; a semaphore caps how many probes run at
//! once. Results are collected as tasks finish, in whatever order. A task
//! that dies (panic, cancellation) is recorded as a failed validation for
//! its URL and never aborts the batch.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::validator::{Fetch, Validator};

/// Validate every URL concurrently, at most `worker_limit` at a time.
///
/// Returns url → probe result. The caller applies results to the registry
/// sequentially afterwards; nothing mutable is shared with the tasks.
pub async fn probe_all<F>(
    validator: Arc<Validator<F>>,
    urls: Vec<String>,
    worker_limit: usize,
) -> HashMap<String, bool>
where
    F: Fetch + 'static,
{
    let total = urls.len();
    info!(total, worker_limit, "probing subscriptions");

    let permits = Arc::new(Semaphore::new(worker_limit.max(1)));
    let mut tasks = JoinSet::new();
    let mut task_urls = HashMap::with_capacity(total);

    for url in urls {
        let validator = Arc::clone(&validator);
        let permits = Arc::clone(&permits);
        let task_url = url.clone();
        let handle = tasks.spawn(async move {
            // Closed only if the pool were dropped mid-run, which join
            // handling below treats as a failed probe.
            let _permit = permits.acquire_owned().await;
            validator.validate(&task_url).await
        });
        task_urls.insert(handle.id(), url);
    }

    let mut results = HashMap::with_capacity(total);
    while let Some(joined) = tasks.join_next_with_id().await {
        match joined {
            Ok((id, ok)) => {
                if let Some(url) = task_urls.remove(&id) {
                    debug!(%url, ok, "probe finished");
                    results.insert(url, ok);
                }
            }
            Err(e) => {
                // One probe died; its siblings keep running.
                if let Some(url) = task_urls.remove(&e.id()) {
                    error!(%url, error = %e, "probe task failed, treating as invalid");
                    results.insert(url, false);
                }
            }
        }
    }

    let healthy = results.values().filter(|&&ok| ok).count();
    info!(healthy, total, "probe batch complete");
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::error::ProbeError;
    use crate::validator::RetryPolicy;

    /// Transport that answers from a fixed table and tracks peak concurrency.
    struct TableFetch {
        valid: Vec<String>,
        panic_on: Option<String>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl TableFetch {
        fn new(valid: &[&str]) -> Self {
            Self {
                valid: valid.iter().map(|s| s.to_string()).collect(),
                panic_on: None,
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }

        fn panicking_on(mut self, url: &str) -> Self {
            self.panic_on = Some(url.to_string());
            self
        }
    }

    impl Fetch for TableFetch {
        async fn fetch(&self, url: &str) -> Result<String, ProbeError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.panic_on.as_deref() == Some(url) {
                panic!("scripted task failure");
            }
            if self.valid.iter().any(|v| v == url) {
                Ok("vmess://eyJ2IjoiMiJ9".to_string())
            } else {
                Err(ProbeError::Transport("unreachable".into()))
            }
        }
    }

    fn validator(fetch: TableFetch) -> Arc<Validator<TableFetch>> {
        Arc::new(Validator::new(
            fetch,
            RetryPolicy {
                attempts: 1,
                delay: Duration::ZERO,
            },
        ))
    }

    #[tokio::test]
    async fn collects_all_results() {
        let urls = vec![
            "https://a.example/sub".to_string(),
            "https://b.example/sub".to_string(),
            "https://c.example/sub".to_string(),
        ];
        let v = validator(TableFetch::new(&["https://b.example/sub"]));
        let results = probe_all(v, urls, 4).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results["https://a.example/sub"], false);
        assert_eq!(results["https://b.example/sub"], true);
        assert_eq!(results["https://c.example/sub"], false);
    }

    #[tokio::test]
    async fn respects_worker_limit() {
        let urls: Vec<String> = (0..12)
            .map(|i| format!("https://host-{i}.example/sub"))
            .collect();
        let v = validator(TableFetch::new(&[]));
        let results = probe_all(Arc::clone(&v), urls, 3).await;

        assert_eq!(results.len(), 12);
        let peak = v.fetcher().peak.load(Ordering::SeqCst);
        assert!(peak <= 3, "peak concurrency {peak} exceeded the limit");
    }

    #[tokio::test]
    async fn panicking_task_records_false_and_spares_siblings() {
        let urls = vec![
            "https://ok.example/sub".to_string(),
            "https://boom.example/sub".to_string(),
        ];
        let fetch = TableFetch::new(&["https://ok.example/sub"]).panicking_on("https://boom.example/sub");
        let results = probe_all(validator(fetch), urls, 2).await;

        assert_eq!(results["https://boom.example/sub"], false);
        assert_eq!(results["https://ok.example/sub"], true);
    }

    #[tokio::test]
    async fn empty_batch_is_empty_map() {
        let v = validator(TableFetch::new(&[]));
        let results = probe_all(v, Vec::new(), 8).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn zero_worker_limit_still_makes_progress() {
        let urls = vec!["https://a.example/sub".to_string()];
        let v = validator(TableFetch::new(&["https://a.example/sub"]));
        let results = probe_all(v, urls, 0).await;
        assert_eq!(results["https://a.example/sub"], true);
    }
}
