//! External Integrations
//!
//! Adapters for GitHub Issues (the source) and JIRA (the tracker).
//!
//! The sync talks to both through the [`IssueSource`] and [`IssueTracker`]
//! traits, so a run can be driven against in-memory doubles.

pub mod github;
pub mod jira;

use crate::Result;
use async_trait::async_trait;

// GitHub exports
pub use github::{GitHubAdapter, GitHubIssue, GitHubLabel, SourceIssue};

// JIRA exports
pub use jira::{
    CreatedIssue, IdRef, JiraAdapter, JiraComponent, JiraFields, JiraIssue, JiraTransition,
    NameRef, NewIssueFields, ProjectCategories, ProjectRef,
};

/// Where labelled issues are read from
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// All open issues in `repository` (`owner/name`) carrying `label`
    async fn labeled_issues(&self, repository: &str, label: &str) -> Result<Vec<SourceIssue>>;
}

/// Where mirrored items live
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Items matching `jql`, at most `max_results`
    async fn search(&self, jql: &str, max_results: u32) -> Result<Vec<JiraIssue>>;

    /// Recognized components of `project`
    async fn project_categories(&self, project: &str) -> Result<ProjectCategories>;

    async fn create_issue(&self, fields: &NewIssueFields) -> Result<CreatedIssue>;

    /// Move `issue` (id or key) through the transition named `transition_name`
    async fn transition_issue(&self, issue: &str, transition_name: &str) -> Result<()>;
}
