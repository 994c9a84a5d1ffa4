//! github-to-jira - mirror labelled GitHub issues into Jira
//!
//! A scheduled job: each invocation scans a fixed list of repositories for
//! open issues labelled `jira`, skips the ones already mirrored (their URL
//! appears in an existing item's description), and creates a Jira Bug for
//! each of the rest, labelled and assigned components by repository.
//!
//! # Architecture
//!
//! - **config**: job settings, secret stores and credential normalization
//! - **integrations**: GitHub and JIRA REST adapters
//! - **sync**: classification, deduplication, payloads and the sync pass
//! - **handler**: invocation entry point and response shape

pub mod config;
pub mod error;
pub mod handler;
pub mod integrations;
pub mod logging;
pub mod sync;

// Re-exports
pub use error::{Result, SyncError};
pub use handler::{handle, InvocationResponse, SyncSummary};
pub use sync::{run_sync, CreatedItem};
