//! sublink-probe — subscription URL validation and concurrent probing.
//!
//! # Architecture
//!
//! ```text
//! probe_all(validator, urls, worker_limit)
//!   ├── Semaphore-bounded tokio::spawn per url
//!   │   └── Validator::validate
//!   │       ├── Fetch (transport trait; HTTP impl via reqwest)
//!   │       │   └── transport failure → bounded retries with delay
//!   │       └── content predicate → reject without retry
//!   └── url → bool map, collected as tasks finish
//! ```
//!
//! The validator never raises: transport errors are retried then downgraded
//! to `false`, content-invalid payloads are `false` immediately, and a task
//! that dies inside the pool is recorded as `false` without aborting its
//! siblings. Result application back into the registry happens in the
//! caller, strictly after collection — the pool shares nothing mutable.

pub mod content;
pub mod error;
pub mod prober;
pub mod validator;

pub use error::ProbeError;
pub use prober::probe_all;
pub use validator::{Fetch, HttpFetcher, RetryPolicy, Validator};
