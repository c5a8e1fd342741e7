//! Domain types for the subscription registry.
//!
//! These types define the persisted registry document. All timestamps are
//! unix epoch seconds. Unknown fields are ignored on load and missing
//! counters default to zero, so older document shapes remain readable.

use serde::{Deserialize, Serialize};

/// Health status of a subscription URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Probed on every run; any failure streak is still within tolerance.
    #[default]
    Active,
    /// Failed for longer than the failure window. Terminal.
    Expired,
}

/// One health record per unique subscription URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    /// The subscription URL. Unique, case-sensitive exact-match key.
    pub url: String,
    #[serde(default)]
    pub status: SubscriptionStatus,
    /// Consecutive failures since the last success.
    #[serde(default)]
    pub failure_count: u32,
    /// Epoch secs of the first failure in the current streak.
    /// Set on the first failure after a success, cleared on success.
    #[serde(default)]
    pub first_failure: Option<u64>,
    /// Epoch secs of the most recent successful probe.
    #[serde(default)]
    pub last_success: Option<u64>,
    /// Epoch secs of the most recent probe attempt, success or failure.
    #[serde(default)]
    pub last_check: Option<u64>,
}

impl SubscriptionRecord {
    /// A fresh record for a newly discovered URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: SubscriptionStatus::Active,
            failure_count: 0,
            first_failure: None,
            last_success: None,
            last_check: None,
        }
    }
}

/// The persisted registry document: one ordered array of records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryDocument {
    #[serde(default)]
    pub subscriptions: Vec<SubscriptionRecord>,
}

/// Lifecycle thresholds, passed explicitly to the registry.
#[derive(Debug, Clone, Copy)]
pub struct LifecycleConfig {
    /// Days a subscription may keep failing before it is expired.
    pub max_failure_days: u64,
}

impl LifecycleConfig {
    pub const fn new(max_failure_days: u64) -> Self {
        Self { max_failure_days }
    }

    /// The failure window in seconds.
    pub const fn window_secs(&self) -> u64 {
        self.max_failure_days * 24 * 60 * 60
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            max_failure_days: 7,
        }
    }
}
