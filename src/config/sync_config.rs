//! Sync job configuration
//!
//! Every field defaults to the stock job, so the binary runs without a
//! config file. A YAML file can override any subset (repository list,
//! classification rules, Jira constants).

use crate::sync::Classifier;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Repositories scanned by the stock job, in scan order
pub const DEFAULT_REPOSITORIES: &[&str] = &[
    "ansible-collections/amazon.aws",
    "ansible-collections/kubernetes.core",
    "ansible-collections/amazon.cloud",
    "ansible-collections/cloud.terraform",
    "ansible-collections/cloud.common",
    "ansible-collections/community.aws",
    "ansible-collections/community.okd",
    "redhat-cop/cloud.aws_ops",
    "redhat-cop/cloud.aws_troubleshooting",
    "redhat-cop/cloud.gcp_ops",
    "redhat-cop/cloud.terraform_ops",
    "ansible/terraform-provider-aap",
    "ansible/terraform-provider-ansible",
];

/// GitHub settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubSettings {
    /// GitHub instance URL (e.g., "https://github.com" or an Enterprise host)
    #[serde(default = "default_github_url")]
    pub url: String,
}

fn default_github_url() -> String {
    "https://github.com".to_string()
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            url: default_github_url(),
        }
    }
}

/// JIRA settings; the server URL itself comes from the secret
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraSettings {
    /// Target project key
    #[serde(default = "default_project")]
    pub project: String,

    /// Label carried by every mirrored item, used to find them again
    #[serde(default = "default_tracker_label")]
    pub tracker_label: String,

    /// Search result cap
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    #[serde(default = "default_issue_type")]
    pub issue_type: String,

    #[serde(default = "default_priority")]
    pub priority: String,

    /// Id of the version set on created items
    #[serde(default = "default_fix_version_id")]
    pub fix_version_id: String,

    /// Workstream custom field id and the option it is set to
    #[serde(default = "default_workstream_field")]
    pub workstream_field: String,

    #[serde(default = "default_workstream_value")]
    pub workstream_value: String,

    /// Transition applied right after creation
    #[serde(default = "default_target_status")]
    pub target_status: String,
}

fn default_project() -> String {
    "ACA".to_string()
}

fn default_tracker_label() -> String {
    "github".to_string()
}

fn default_max_results() -> u32 {
    1000
}

fn default_issue_type() -> String {
    "Bug".to_string()
}

fn default_priority() -> String {
    "Undefined".to_string()
}

fn default_fix_version_id() -> String {
    "12398634".to_string()
}

fn default_workstream_field() -> String {
    "customfield_12319275".to_string()
}

fn default_workstream_value() -> String {
    "Cloud Content".to_string()
}

fn default_target_status() -> String {
    "Backlog".to_string()
}

impl Default for JiraSettings {
    fn default() -> Self {
        Self {
            project: default_project(),
            tracker_label: default_tracker_label(),
            max_results: default_max_results(),
            issue_type: default_issue_type(),
            priority: default_priority(),
            fix_version_id: default_fix_version_id(),
            workstream_field: default_workstream_field(),
            workstream_value: default_workstream_value(),
            target_status: default_target_status(),
        }
    }
}

/// Sync job configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub github: GitHubSettings,

    /// GitHub label that marks an issue for mirroring
    #[serde(default = "default_source_label")]
    pub source_label: String,

    /// Repository identifiers (`owner/name`), scanned in order
    #[serde(default = "default_repositories")]
    pub repositories: Vec<String>,

    #[serde(default)]
    pub jira: JiraSettings,

    /// Repository to labels/components rules
    #[serde(default)]
    pub classification: Classifier,
}

fn default_source_label() -> String {
    "jira".to_string()
}

fn default_repositories() -> Vec<String> {
    DEFAULT_REPOSITORIES.iter().map(|s| s.to_string()).collect()
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            github: GitHubSettings::default(),
            source_label: default_source_label(),
            repositories: default_repositories(),
            jira: JiraSettings::default(),
            classification: Classifier::default(),
        }
    }
}

impl SyncConfig {
    /// Load configuration overrides from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(crate::SyncError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), "Loading sync configuration");

        let content = fs::read_to_string(path)?;
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(&content)?
        };

        tracing::debug!(
            repositories = config.repositories.len(),
            rules = config.classification.rules.len(),
            project = %config.jira.project,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Load from `path` if given, otherwise use the stock job
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Reject configurations the sync cannot run with
    pub fn validate(&self) -> Result<()> {
        super::validation::validate_config(self).map_err(|errors| {
            crate::SyncError::Config(
                errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })
    }

    /// JQL selecting the items this job has already created
    pub fn mirrored_items_jql(&self) -> String {
        crate::integrations::JiraAdapter::mirrored_items_jql(
            &self.jira.project,
            &self.jira.tracker_label,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.repositories.len(), 13);
        assert_eq!(config.repositories[0], "ansible-collections/amazon.aws");
        assert_eq!(
            config.repositories[12],
            "ansible/terraform-provider-ansible"
        );
        assert_eq!(config.source_label, "jira");
        assert_eq!(config.jira.max_results, 1000);
        assert_eq!(config.jira.target_status, "Backlog");
        assert_eq!(config.mirrored_items_jql(), "project=ACA and labels=github");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_override() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "repositories:\n  - org/one\n  - org/two\njira:\n  project: TEST\n"
        )
        .unwrap();

        let config = SyncConfig::load(file.path()).unwrap();
        assert_eq!(config.repositories, vec!["org/one", "org/two"]);
        assert_eq!(config.jira.project, "TEST");
        // untouched fields keep their defaults
        assert_eq!(config.jira.tracker_label, "github");
        assert_eq!(config.source_label, "jira");
        assert_eq!(config.classification, Classifier::default());
    }

    #[test]
    fn test_load_empty_file() {
        let file = NamedTempFile::new().unwrap();
        let config = SyncConfig::load(file.path()).unwrap();
        assert_eq!(config.repositories.len(), 13);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SyncConfig::load("/nonexistent/github-to-jira.yaml").unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_or_default() {
        let config = SyncConfig::load_or_default(None).unwrap();
        assert_eq!(config.jira.project, "ACA");
    }
}
