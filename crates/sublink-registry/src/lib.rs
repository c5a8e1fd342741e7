//! sublink-registry — the subscription lifecycle state machine.
//!
//! Owns the persisted set of subscription URLs and their health records.
//! Each run loads the registry, absorbs newly discovered URLs, applies
//! probe results through the transition function, and serializes the
//! result back out.
//!
//! # Lifecycle
//!
//! ```text
//! active --success--> active   (failure_count = 0, first_failure cleared)
//! active --failure--> active   (failure_count += 1, first_failure pinned)
//! active --failure--> expired  (now - first_failure > failure window)
//! expired                      (terminal; never probed again)
//! ```
//!
//! The registry is exclusively owned by a single run: loaded once, mutated
//! in place, written once. No locking discipline is needed.

pub mod discover;
pub mod error;
pub mod registry;
pub mod types;

pub use error::{RegistryError, RegistryResult};
pub use registry::Registry;
pub use types::{LifecycleConfig, RegistryDocument, SubscriptionRecord, SubscriptionStatus};
