//! Invocation entry point
//!
//! Resolves the secret, validates credentials, runs one sync pass and wraps
//! the outcome in the response shape schedulers expect
//! (`{"statusCode": 200, "body": "..."}`).

use crate::config::{load_credentials, SecretStore, SyncConfig};
use crate::sync::{run_sync, CreatedItem};
use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Environment variable naming the secret to load credentials from
pub const SECRET_ID_VAR: &str = "GITHUB_JIRA_SECRET_ID";

/// Response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    /// Number of items created
    pub created: usize,
    /// Created items in creation order
    pub issues: Vec<CreatedItem>,
}

impl From<Vec<CreatedItem>> for SyncSummary {
    fn from(issues: Vec<CreatedItem>) -> Self {
        Self {
            created: issues.len(),
            issues,
        }
    }
}

/// Invocation response; `body` holds the pretty-printed [`SyncSummary`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl InvocationResponse {
    pub fn ok(summary: &SyncSummary) -> Result<Self> {
        Ok(Self {
            status_code: 200,
            body: serde_json::to_string_pretty(summary)?,
        })
    }

    /// Parse the body back into a summary
    pub fn summary(&self) -> Result<SyncSummary> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Run one invocation
///
/// Configuration problems (no secret id, no secret payload, missing
/// credential fields, invalid config) surface before any remote call.
pub async fn handle(
    config: &SyncConfig,
    store: &dyn SecretStore,
    secret_id: Option<&str>,
) -> Result<InvocationResponse> {
    info!("Starting GitHub->JIRA sync");

    let secret_id = secret_id.filter(|s| !s.trim().is_empty()).ok_or_else(|| {
        crate::SyncError::Config(format!("{} environment variable is required", SECRET_ID_VAR))
    })?;

    config.validate()?;

    info!(secret_id = %secret_id, "Loading config from secret");
    let credentials = load_credentials(store, secret_id).await?.validate()?;

    let created = run_sync(config, &credentials).await?;

    info!(
        count = created.len(),
        keys = ?created.iter().map(|c| c.key.as_str()).collect::<Vec<_>>(),
        "Finished"
    );

    InvocationResponse::ok(&SyncSummary::from(created))
}
