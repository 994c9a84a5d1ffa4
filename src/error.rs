//! Error types for github-to-jira
//!
//! Two families matter to callers: configuration errors, raised before any
//! Jira call is made, and remote errors from GitHub or Jira, which abort the
//! run wherever they happen.

use thiserror::Error;

/// Result type alias for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Error type for sync operations
#[derive(Error, Debug)]
pub enum SyncError {
    /// Configuration errors (environment, secret payload, config file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required credential fields absent after secret normalization
    #[error(
        "Configuration error: secret must contain Jira and GitHub credentials. Missing: {}. \
         Use cloud_team_jira_bot_token, cloud_team_jira_server and cloud_team_gh_token \
         (or the legacy jira_token, jira_server and gh_token).",
        .0.join(", ")
    )]
    MissingCredentials(Vec<String>),

    /// Remote API errors (GitHub, Jira)
    #[error("Integration error: {0}")]
    Integration(String),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// True for errors caused by local configuration rather than a remote call
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            SyncError::Config(_)
                | SyncError::MissingCredentials(_)
                | SyncError::Yaml(_)
                | SyncError::Io(_)
        )
    }

    /// True for errors raised by GitHub or Jira
    pub fn is_remote(&self) -> bool {
        matches!(self, SyncError::Integration(_) | SyncError::Http(_))
    }
}
