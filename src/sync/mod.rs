//! GitHub to Jira sync
//!
//! Mirrors labelled GitHub issues into Jira. Each pass recomputes what is
//! already mirrored from Jira itself, so there is no local state.
//!
//! Two passes started at the same time can both create an item for the same
//! issue: each dedups against a snapshot taken before it creates anything.

pub mod classifier;
pub mod dedup;
pub mod payload;
mod runner;

pub use classifier::{short_name, Classification, ClassificationRule, Classifier};
pub use dedup::{filter_unmirrored, DescriptionScan, MirrorIndex};
pub use runner::{run_sync, CreatedItem, Syncer};
