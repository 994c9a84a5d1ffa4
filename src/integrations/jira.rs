//! JIRA Integration Adapter
//!
//! Query, create and transition issues through the JIRA REST API (v2, which
//! keeps descriptions as wiki-markup strings).

use super::IssueTracker;
use crate::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Per-request timeout for search/query operations (large result sets)
const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);
/// Per-request timeout for small reads
const GET_TIMEOUT: Duration = Duration::from_secs(10);
/// Per-request timeout for create/update operations
const WRITE_TIMEOUT: Duration = Duration::from_secs(15);

/// Fields requested from search; only the description matters for dedup
const SEARCH_FIELDS: &str = "summary,description,labels";

/// Component names the sync recognizes in the target project
pub const CONTAINER_NATIVE: &str = "Container Native";
pub const PUBLIC_CLOUD: &str = "Public Cloud";
pub const PRIVATE_CLOUD: &str = "Private Cloud";

/// JIRA API client
pub struct JiraAdapter {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

/// JIRA issue as returned by search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraIssue {
    pub key: String,
    pub id: String,
    pub fields: JiraFields,
}

/// The subset of issue fields the sync reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraFields {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraSearchResponse {
    #[serde(default)]
    pub total: u32,
    #[serde(rename = "startAt", default)]
    pub start_at: u32,
    #[serde(rename = "maxResults", default)]
    pub max_results: u32,
    pub issues: Vec<JiraIssue>,
}

/// Project component ("category")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JiraComponent {
    pub id: String,
    pub name: String,
}

/// The recognized components found in a project; absent ones stay unset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectCategories {
    pub container_native: Option<JiraComponent>,
    pub public_cloud: Option<JiraComponent>,
    pub private_cloud: Option<JiraComponent>,
}

impl ProjectCategories {
    pub fn resolve(components: Vec<JiraComponent>) -> Self {
        let mut categories = Self::default();
        for component in components {
            match component.name.as_str() {
                CONTAINER_NATIVE => categories.container_native = Some(component),
                PUBLIC_CLOUD => categories.public_cloud = Some(component),
                PRIVATE_CLOUD => categories.private_cloud = Some(component),
                _ => continue,
            }
        }
        categories
    }

    fn name(slot: &Option<JiraComponent>) -> Option<&str> {
        slot.as_ref().map(|c| c.name.as_str())
    }
}

/// Reference by name, as used for issue type, priority and components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRef {
    pub name: String,
}

/// Reference by id, as used for versions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub key: String,
}

/// Fields of an issue to create
///
/// `custom_fields` is flattened so each entry becomes its own
/// `customfield_NNNNN` key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewIssueFields {
    pub project: ProjectRef,
    pub summary: String,
    pub description: String,
    #[serde(rename = "issuetype")]
    pub issue_type: NameRef,
    pub labels: Vec<String>,
    pub priority: NameRef,
    pub components: Vec<NameRef>,
    pub versions: Vec<IdRef>,
    #[serde(flatten)]
    pub custom_fields: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
struct CreateIssueRequest<'a> {
    fields: &'a NewIssueFields,
}

/// Response to issue creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIssue {
    pub id: String,
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraTransition {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraTransitionsResponse {
    pub transitions: Vec<JiraTransition>,
}

#[derive(Debug, Clone, Serialize)]
struct JiraTransitionRequest {
    transition: JiraTransitionId,
}

#[derive(Debug, Clone, Serialize)]
struct JiraTransitionId {
    id: String,
}

impl JiraAdapter {
    /// Create a new JIRA adapter for `server`
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(server: &str) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        let base_url = format!("{}/rest/api/2", server.trim_end_matches('/'));

        Ok(Self {
            client,
            base_url,
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

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the JQL selecting previously mirrored items
    pub fn mirrored_items_jql(project: &str, label: &str) -> String {
        format!(
            "project={} and labels={}",
            Self::sanitize(project),
            Self::sanitize(label)
        )
    }

    /// Sanitize a value for safe use in JQL queries.
    /// Only allows alphanumeric characters, hyphens and underscores.
    fn sanitize(value: &str) -> String {
        value
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
            .collect()
    }

    fn map_error(status: StatusCode, context: &str, body: String) -> crate::SyncError {
        match status {
            StatusCode::UNAUTHORIZED => {
                crate::SyncError::Integration("JIRA authentication failed".to_string())
            }
            _ => crate::SyncError::Integration(format!(
                "JIRA API error {}: HTTP {}: {}",
                context, status, body
            )),
        }
    }

    /// Search for issues using JQL
    ///
    /// Walks result pages from `startAt=0` until `max_results` issues are
    /// collected, `total` is reached, or the server returns an empty page.
    /// Servers may cap the page size below what was requested.
    pub async fn search(&self, jql: &str, max_results: u32) -> Result<Vec<JiraIssue>> {
        debug!(jql = %jql, max_results = %max_results, "Searching JIRA issues");

        let cap = max_results as usize;
        let mut issues: Vec<JiraIssue> = Vec::new();
        let mut total = 0;

        while issues.len() < cap {
            let remaining = (cap - issues.len()) as u32;
            let page = self.search_page(jql, issues.len() as u32, remaining).await?;
            total = page.total as usize;
            let returned = page.issues.len();
            issues.extend(page.issues);

            debug!(start_at = page.start_at, returned, total, "Fetched JIRA search page");

            if returned == 0 || issues.len() >= total {
                break;
            }
        }
        issues.truncate(cap);

        info!(total, returned = issues.len(), "JIRA search complete");
        if total > issues.len() {
            warn!(total, max_results, "JIRA search truncated at result cap");
        }
        Ok(issues)
    }

    async fn search_page(
        &self,
        jql: &str,
        start_at: u32,
        max_results: u32,
    ) -> Result<JiraSearchResponse> {
        let url = format!("{}/search", self.base_url);

        let params = [
            ("jql", jql.to_string()),
            ("startAt", start_at.to_string()),
            ("maxResults", max_results.to_string()),
            ("fields", SEARCH_FIELDS.to_string()),
        ];

        let mut request = self.client.get(&url).query(&params);
        if let Some(ref token) = self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.timeout(SEARCH_TIMEOUT).send().await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                Err(crate::SyncError::Integration(format!(
                    "Rate limited, retry after {} seconds",
                    retry_after
                )))
            }
            status => {
                let error_body = response.text().await.unwrap_or_default();
                Err(Self::map_error(status, "searching issues", error_body))
            }
        }
    }

    /// List the components defined in a project
    pub async fn project_components(&self, project: &str) -> Result<Vec<JiraComponent>> {
        let url = format!("{}/project/{}/components", self.base_url, project);

        debug!(project = %project, "Listing JIRA components");

        let mut request = self.client.get(&url);
        if let Some(ref token) = self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.timeout(GET_TIMEOUT).send().await?;

        match response.status() {
            StatusCode::OK => {
                let components: Vec<JiraComponent> = response.json().await?;
                debug!(count = components.len(), "Listed JIRA components");
                Ok(components)
            }
            StatusCode::NOT_FOUND => Err(crate::SyncError::Integration(format!(
                "JIRA project not found: {}",
                project
            ))),
            status => {
                let error_body = response.text().await.unwrap_or_default();
                Err(Self::map_error(status, "listing components", error_body))
            }
        }
    }

    /// Fetch the project's components and pick out the recognized ones
    pub async fn project_categories(&self, project: &str) -> Result<ProjectCategories> {
        let categories = ProjectCategories::resolve(self.project_components(project).await?);
        info!(
            project = %project,
            container_native = ?ProjectCategories::name(&categories.container_native),
            public_cloud = ?ProjectCategories::name(&categories.public_cloud),
            private_cloud = ?ProjectCategories::name(&categories.private_cloud),
            "Resolved JIRA components"
        );
        Ok(categories)
    }

    /// Create an issue
    pub async fn create_issue(&self, fields: &NewIssueFields) -> Result<CreatedIssue> {
        let url = format!("{}/issue", self.base_url);

        debug!(summary = %fields.summary, "Creating JIRA issue");

        let mut request = self
            .client
            .post(&url)
            .json(&CreateIssueRequest { fields });
        if let Some(ref token) = self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.timeout(WRITE_TIMEOUT).send().await?;

        match response.status() {
            StatusCode::CREATED | StatusCode::OK => Ok(response.json().await?),
            status => {
                let error_body = response.text().await.unwrap_or_default();
                Err(Self::map_error(status, "creating issue", error_body))
            }
        }
    }

    /// Get available transitions for an issue
    pub async fn get_transitions(&self, issue: &str) -> Result<Vec<JiraTransition>> {
        let url = format!("{}/issue/{}/transitions", self.base_url, issue);

        let mut request = self.client.get(&url);
        if let Some(ref token) = self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.timeout(GET_TIMEOUT).send().await?;

        match response.status() {
            StatusCode::OK => {
                let result: JiraTransitionsResponse = response.json().await?;
                Ok(result.transitions)
            }
            status => {
                let error_body = response.text().await.unwrap_or_default();
                Err(Self::map_error(status, "listing transitions", error_body))
            }
        }
    }

    /// Apply the transition whose name matches `transition_name`
    /// (case-insensitive)
    pub async fn transition_issue(&self, issue: &str, transition_name: &str) -> Result<()> {
        let transitions = self.get_transitions(issue).await?;
        let transition = transitions
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(transition_name))
            .ok_or_else(|| {
                crate::SyncError::Integration(format!(
                    "Invalid transition name '{}' for JIRA issue {} (available: {})",
                    transition_name,
                    issue,
                    transitions
                        .iter()
                        .map(|t| t.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })?;

        let url = format!("{}/issue/{}/transitions", self.base_url, issue);
        let body = JiraTransitionRequest {
            transition: JiraTransitionId {
                id: transition.id.clone(),
            },
        };

        info!(issue = %issue, transition = %transition.name, "Transitioning JIRA issue");

        let mut request = self.client.post(&url).json(&body);
        if let Some(ref token) = self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.timeout(WRITE_TIMEOUT).send().await?;

        match response.status() {
            StatusCode::NO_CONTENT | StatusCode::OK => Ok(()),
            status => {
                let error_body = response.text().await.unwrap_or_default();
                Err(Self::map_error(status, "transitioning issue", error_body))
            }
        }
    }
}

#[async_trait]
impl IssueTracker for JiraAdapter {
    async fn search(&self, jql: &str, max_results: u32) -> Result<Vec<JiraIssue>> {
        JiraAdapter::search(self, jql, max_results).await
    }

    async fn project_categories(&self, project: &str) -> Result<ProjectCategories> {
        JiraAdapter::project_categories(self, project).await
    }

    async fn create_issue(&self, fields: &NewIssueFields) -> Result<CreatedIssue> {
        JiraAdapter::create_issue(self, fields).await
    }

    async fn transition_issue(&self, issue: &str, transition_name: &str) -> Result<()> {
        JiraAdapter::transition_issue(self, issue, transition_name).await
    }
}
