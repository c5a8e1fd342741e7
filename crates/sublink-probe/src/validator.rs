//! Validator — bounded-retry reachability and content checks.
//!
//! `validate(url)` is the whole contract: a boolean, never an error.
//! Transport failures burn retry attempts; a reachable endpoint whose body
//! fails the content predicate is rejected immediately without spending the
//! remaining budget.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::content;
use crate::error::ProbeError;

/// Transport seam for the validator. The production impl is [`HttpFetcher`];
/// tests substitute scripted fetchers to count attempts exactly.
pub trait Fetch: Send + Sync {
    /// Fetch the body at `url`, or a transport-level error.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, ProbeError>> + Send;
}

/// Retry budget for transport failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub attempts: u32,
    /// Sleep between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(3),
        }
    }
}

/// Validates subscription URLs through a [`Fetch`] transport.
#[derive(Debug, Clone)]
pub struct Validator<F> {
    fetcher: F,
    policy: RetryPolicy,
}

impl<F: Fetch> Validator<F> {
    pub fn new(fetcher: F, policy: RetryPolicy) -> Self {
        Self { fetcher, policy }
    }

    #[cfg(test)]
    pub(crate) fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Whether `url` is reachable and serves a valid subscription payload.
    ///
    /// Transport failures are retried up to the policy's attempt budget;
    /// a content-invalid 2xx response returns `false` without retrying.
    pub async fn validate(&self, url: &str) -> bool {
        debug!(%url, "validating subscription");
        let attempts = self.policy.attempts.max(1);
        for attempt in 1..=attempts {
            match self.fetcher.fetch(url).await {
                Ok(body) => {
                    if content::is_valid_subscription(&body) {
                        info!(%url, "subscription reachable and valid");
                        return true;
                    }
                    warn!(%url, "subscription reachable but content invalid");
                    return false;
                }
                Err(e) => {
                    warn!(%url, attempt, attempts, error = %e, "subscription fetch failed");
                    if attempt < attempts && !self.policy.delay.is_zero() {
                        tokio::time::sleep(self.policy.delay).await;
                    }
                }
            }
        }
        false
    }
}

/// reqwest-backed transport with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("sublink-probe/0.1")
            .build()
            .map_err(|e| ProbeError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ProbeError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProbeError::Transport(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ProbeError::Status(status.as_u16()));
        }
        resp.text()
            .await
            .map_err(|e| ProbeError::Transport(e.to_string()))
    }
}
