//! GitHub Issues adapter
//!
//! Lists labelled open issues per repository through the REST API.

use super::IssueSource;
use crate::config::GitHubSettings;
use crate::Result;
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Per-request timeout for list operations
const LIST_TIMEOUT: Duration = Duration::from_secs(30);

/// Page size for issue listing (GitHub maximum)
const PER_PAGE: usize = 100;

/// GitHub REST client
pub struct GitHubAdapter {
    client: Client,
    rest_base_url: String,
    auth_token: Option<String>,
}

/// An issue as returned by `GET /repos/{owner}/{repo}/issues`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubIssue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub labels: Vec<GitHubLabel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubLabel {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// A labelled GitHub issue, the unit the sync mirrors into Jira
///
/// Identity is `html_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceIssue {
    /// Repository identifier, `owner/name`
    pub repository: String,
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    /// Canonical web URL, used as the deduplication key
    pub html_url: String,
    pub labels: Vec<String>,
}

impl SourceIssue {
    fn from_github(repository: &str, issue: GitHubIssue) -> Self {
        Self {
            repository: repository.to_string(),
            number: issue.number,
            title: issue.title,
            body: issue.body,
            html_url: issue.html_url,
            labels: issue.labels.into_iter().map(|l| l.name).collect(),
        }
    }
}

impl GitHubAdapter {
    /// Create a new GitHub adapter
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &GitHubSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .default_headers({
                let mut headers = header::HeaderMap::new();
                headers.insert(
                    header::USER_AGENT,
                    header::HeaderValue::from_static(concat!(
                        "github-to-jira/",
                        env!("CARGO_PKG_VERSION")
                    )),
                );
                headers.insert(
                    header::ACCEPT,
                    header::HeaderValue::from_static("application/vnd.github.v3+json"),
                );
                headers
            })
            .build()?;

        let base_url = config.url.trim_end_matches('/');
        let rest_base_url =
            if base_url.contains("github.com") && !base_url.contains("api.github.com") {
                "https://api.github.com".to_string()
            } else if base_url.contains("api.github.com") {
                base_url.to_string()
            } else {
                // GitHub Enterprise Server
                format!("{}/api/v3", base_url)
            };

        Ok(Self {
            client,
            rest_base_url,
            auth_token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_token.is_some()
    }

    pub fn rest_base_url(&self) -> &str {
        &self.rest_base_url
    }

    /// Fetch one page of open issues carrying `label`
    async fn list_issues_page(
        &self,
        repository: &str,
        label: &str,
        page: u32,
    ) -> Result<Vec<GitHubIssue>> {
        let url = format!("{}/repos/{}/issues", self.rest_base_url, repository);
        let params = [
            ("state", "open".to_string()),
            ("labels", label.to_string()),
            ("per_page", PER_PAGE.to_string()),
            ("page", page.to_string()),
        ];

        debug!(repository = %repository, label = %label, page, "Listing GitHub issues");

        let mut request = self.client.get(&url).query(&params);
        if let Some(ref token) = self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.timeout(LIST_TIMEOUT).send().await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(crate::SyncError::Integration(format!(
                "GitHub repository not found: {}",
                repository
            ))),
            StatusCode::UNAUTHORIZED => Err(crate::SyncError::Integration(
                "GitHub authentication failed".to_string(),
            )),
            StatusCode::FORBIDDEN => Err(crate::SyncError::Integration(
                "GitHub API forbidden (rate limit?)".to_string(),
            )),
            status => {
                let error_body = response.text().await.unwrap_or_default();
                Err(crate::SyncError::Integration(format!(
                    "GitHub API error: HTTP {}: {}",
                    status, error_body
                )))
            }
        }
    }

    /// List every open issue in `repository` carrying `label`
    ///
    /// Walks pages until GitHub returns a short one. The issues endpoint
    /// also returns pull requests carrying the label; they are kept.
    pub async fn list_labeled_issues(
        &self,
        repository: &str,
        label: &str,
    ) -> Result<Vec<SourceIssue>> {
        let mut issues = Vec::new();
        let mut page = 1;

        loop {
            let batch = self.list_issues_page(repository, label, page).await?;
            let len = batch.len();
            issues.extend(
                batch
                    .into_iter()
                    .map(|issue| SourceIssue::from_github(repository, issue)),
            );
            if len < PER_PAGE {
                break;
            }
            page += 1;
        }

        info!(
            repository = %repository,
            label = %label,
            count = issues.len(),
            "Fetched labelled GitHub issues"
        );

        Ok(issues)
    }
}

#[async_trait]
impl IssueSource for GitHubAdapter {
    async fn labeled_issues(&self, repository: &str, label: &str) -> Result<Vec<SourceIssue>> {
        self.list_labeled_issues(repository, label).await
    }
}
