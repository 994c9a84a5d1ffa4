//! One sync pass
//!
//! 1. **Snapshot**: fetch items already mirrored into Jira, and the
//!    project's components
//! 2. **Scan**: list labelled issues, repository by repository
//! 3. **Diff**: drop issues whose URL already appears in a snapshot item
//! 4. **Create**: create each remaining issue in Jira and transition it
//!
//! Everything runs sequentially and the first error aborts the pass. Items
//! created before the failure stay created.

use super::classifier::short_name;
use super::dedup::{filter_unmirrored, DescriptionScan};
use super::payload::build_fields;
use crate::config::{SyncConfig, ValidCredentials};
use crate::integrations::{GitHubAdapter, IssueSource, IssueTracker, JiraAdapter, SourceIssue};
use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A Jira item created during the pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedItem {
    /// Jira issue key
    pub key: String,
    /// Source GitHub issue URL
    pub url: String,
}

/// Runs a sync pass against a source and a tracker
pub struct Syncer<'a> {
    config: &'a SyncConfig,
    source: &'a dyn IssueSource,
    tracker: &'a dyn IssueTracker,
}

impl<'a> Syncer<'a> {
    pub fn new(
        config: &'a SyncConfig,
        source: &'a dyn IssueSource,
        tracker: &'a dyn IssueTracker,
    ) -> Self {
        Self {
            config,
            source,
            tracker,
        }
    }

    /// Labelled issues from every configured repository, in list order
    pub async fn scan(&self) -> Result<Vec<SourceIssue>> {
        let mut issues = Vec::new();
        for repository in &self.config.repositories {
            let found = self
                .source
                .labeled_issues(repository, &self.config.source_label)
                .await?;
            debug!(repository = %repository, count = found.len(), "Scanned repository");
            issues.extend(found);
        }
        info!(
            count = issues.len(),
            label = %self.config.source_label,
            "Total GitHub issues with source label"
        );
        Ok(issues)
    }

    /// Execute the pass, returning the created items in creation order
    pub async fn run(&self) -> Result<Vec<CreatedItem>> {
        let jira = &self.config.jira;

        let existing = self
            .tracker
            .search(&self.config.mirrored_items_jql(), jira.max_results)
            .await?;
        info!(
            count = existing.len(),
            project = %jira.project,
            label = %jira.tracker_label,
            "Fetched existing JIRA items"
        );

        // Logged only; component names are submitted as configured
        self.tracker.project_categories(&jira.project).await?;

        let issues = self.scan().await?;

        let to_create = filter_unmirrored(issues, &DescriptionScan::new(&existing));
        info!(count = to_create.len(), "GitHub issues not yet in JIRA");
        for issue in &to_create {
            debug!(
                repository = %short_name(&issue.repository),
                number = issue.number,
                title = %issue.title,
                url = %issue.html_url,
                "Pending issue"
            );
        }

        let mut created = Vec::with_capacity(to_create.len());
        for issue in &to_create {
            created.push(self.mirror(issue).await?);
        }

        info!(count = created.len(), "Sync complete");
        Ok(created)
    }

    /// Create one Jira item for `issue` and move it to the target status
    async fn mirror(&self, issue: &SourceIssue) -> Result<CreatedItem> {
        let classification = self.config.classification.classify(&issue.repository);
        let fields = build_fields(issue, classification, &self.config.jira);

        info!(summary = %fields.summary, url = %issue.html_url, "Creating JIRA issue");
        let new_issue = self.tracker.create_issue(&fields).await?;
        info!(
            key = %new_issue.key,
            id = %new_issue.id,
            url = %issue.html_url,
            "Created JIRA issue"
        );

        self.tracker
            .transition_issue(&new_issue.id, &self.config.jira.target_status)
            .await?;

        Ok(CreatedItem {
            key: new_issue.key,
            url: issue.html_url.clone(),
        })
    }
}

/// Connect to GitHub and Jira with `credentials` and run one pass
pub async fn run_sync(
    config: &SyncConfig,
    credentials: &ValidCredentials,
) -> Result<Vec<CreatedItem>> {
    info!("Connecting to GitHub and JIRA");
    let github = GitHubAdapter::new(&config.github)?.with_token(credentials.gh_token.clone());
    let jira =
        JiraAdapter::new(&credentials.jira_server)?.with_token(credentials.jira_token.clone());

    Syncer::new(config, &github, &jira).run().await
}
