//! Registry — the subscription lifecycle state machine.
//!
//! Owns every `SubscriptionRecord` for one run. Records are kept in
//! document order; a URL index gives O(1) lookup for transitions. The
//! transition function is per-record and independent of completion order,
//! so probe results can be applied in whatever order they arrive.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::error::{RegistryError, RegistryResult};
use crate::types::{LifecycleConfig, RegistryDocument, SubscriptionRecord, SubscriptionStatus};

/// In-memory registry of subscription records.
#[derive(Debug)]
pub struct Registry {
    records: Vec<SubscriptionRecord>,
    /// url → index into `records`.
    index: HashMap<String, usize>,
    config: LifecycleConfig,
}

impl Registry {
    /// An empty registry (cold start).
    pub fn new(config: LifecycleConfig) -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
            config,
        }
    }

    /// Build a registry from a persisted document, dropping duplicate URLs
    /// (first occurrence wins).
    pub fn from_document(doc: RegistryDocument, config: LifecycleConfig) -> Self {
        let mut registry = Self::new(config);
        for record in doc.subscriptions {
            if registry.index.contains_key(&record.url) {
                warn!(url = %record.url, "duplicate url in persisted registry, keeping first");
                continue;
            }
            registry.index.insert(record.url.clone(), registry.records.len());
            registry.records.push(record);
        }
        registry
    }

    /// Parse a persisted registry document. Absent, empty, or malformed
    /// content yields an empty registry — load never fails a run.
    pub fn load(content: Option<&str>, config: LifecycleConfig) -> Self {
        let Some(content) = content else {
            info!("no prior registry document, starting empty");
            return Self::new(config);
        };
        let trimmed = content.trim();
        if trimmed.is_empty() {
            info!("prior registry document is empty, starting empty");
            return Self::new(config);
        }
        match serde_json::from_str::<RegistryDocument>(trimmed) {
            Ok(doc) => {
                let registry = Self::from_document(doc, config);
                info!(count = registry.len(), "registry loaded");
                registry
            }
            Err(e) => {
                warn!(error = %e, "malformed registry document, starting empty");
                Self::new(config)
            }
        }
    }

    /// Strict parse, exposing the failure kind (for tests and callers that
    /// want to distinguish "corrupt" from "cold start").
    pub fn try_load(content: &str, config: LifecycleConfig) -> RegistryResult<Self> {
        let doc: RegistryDocument = serde_json::from_str(content.trim())
            .map_err(|e| RegistryError::Parse(e.to_string()))?;
        Ok(Self::from_document(doc, config))
    }

    /// Serialize the registry back to its persisted document form.
    pub fn to_json(&self) -> RegistryResult<String> {
        let doc = RegistryDocument {
            subscriptions: self.records.clone(),
        };
        serde_json::to_string_pretty(&doc).map_err(|e| RegistryError::Serialize(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, url: &str) -> Option<&SubscriptionRecord> {
        self.index.get(url).map(|&i| &self.records[i])
    }

    /// Create records for candidate URLs not already present. New records
    /// start active with zero failures. Returns how many were created.
    pub fn absorb<I>(&mut self, candidates: I) -> usize
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut created = 0;
        for url in candidates {
            let url = url.into();
            if self.index.contains_key(&url) {
                continue;
            }
            debug!(%url, "new subscription discovered");
            self.index.insert(url.clone(), self.records.len());
            self.records.push(SubscriptionRecord::new(url));
            created += 1;
        }
        if created > 0 {
            info!(created, total = self.len(), "absorbed newly discovered subscriptions");
        }
        created
    }

    /// Whether a record should be submitted to the prober at `now`.
    ///
    /// Excludes expired records, and records whose failure streak already
    /// exceeds the window even if the expired flag was never persisted —
    /// expiry is idempotent whether applied eagerly or lazily.
    pub fn selectable(&self, record: &SubscriptionRecord, now: u64) -> bool {
        if record.status == SubscriptionStatus::Expired {
            return false;
        }
        match record.first_failure {
            Some(first) => now.saturating_sub(first) <= self.config.window_secs(),
            None => true,
        }
    }

    /// URLs of all records the prober should visit this run.
    pub fn selectable_urls(&self, now: u64) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| self.selectable(r, now))
            .map(|r| r.url.clone())
            .collect()
    }

    /// Apply one probe result to the record for `url`.
    ///
    /// Success resets the failure streak; failure extends it and expires the
    /// record once the streak is older than the failure window. Unknown URLs
    /// are ignored (the prober only ever reports URLs it was handed).
    pub fn apply(&mut self, url: &str, probe_ok: bool, now: u64) {
        let Some(&i) = self.index.get(url) else {
            warn!(%url, "probe result for unknown url, ignoring");
            return;
        };
        let record = &mut self.records[i];
        record.last_check = Some(now);

        if probe_ok {
            record.failure_count = 0;
            record.first_failure = None;
            record.last_success = Some(now);
            debug!(%url, "subscription healthy");
            return;
        }

        record.failure_count += 1;
        let first = *record.first_failure.get_or_insert(now);
        if now.saturating_sub(first) > self.config.window_secs() {
            record.status = SubscriptionStatus::Expired;
            info!(
                %url,
                failures = record.failure_count,
                days = self.config.max_failure_days,
                "subscription expired after sustained failure"
            );
        } else {
            debug!(%url, failures = record.failure_count, "subscription failed probe");
        }
    }

    /// URLs of all active records, in document order. This is the published
    /// active list.
    pub fn active_urls(&self) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| r.status == SubscriptionStatus::Active)
            .map(|r| r.url.clone())
            .collect()
    }
}
