//! sublink-gist — the document-store collaborator.
//!
//! A narrow client for the GitHub gist API: load one file, publish one
//! file, and replay a file's content across the revisions committed within
//! a trailing time window. Transport and auth details stay inside this
//! crate; callers see `Result` values and treat every failure as "no data".
//!
//! The gist offers at-least-once delivery and no transactions. A missing
//! gist file is `Ok(None)`, not an error — cold starts are normal.

pub mod client;
pub mod error;

pub use client::GistClient;
pub use error::{GistError, GistResult};
