//! Credentials loaded from the secret store
//!
//! Secrets come in two key-naming conventions: the team-prefixed one
//! (`cloud_team_*`) and the legacy flat one. Both are folded into
//! [`Credentials`], the prefixed key winning when both are set.

use super::secrets::SecretStore;
use crate::Result;
use serde::Deserialize;

/// Canonical credential field names, in reporting order
pub const JIRA_TOKEN: &str = "jira_token";
pub const JIRA_SERVER: &str = "jira_server";
pub const GH_TOKEN: &str = "gh_token";

/// Raw secret payload; unknown keys are ignored
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSecret {
    #[serde(default)]
    cloud_team_jira_bot_token: Option<String>,
    #[serde(default)]
    cloud_team_jira_server: Option<String>,
    #[serde(default)]
    cloud_team_gh_token: Option<String>,
    #[serde(default)]
    jira_token: Option<String>,
    #[serde(default)]
    jira_server: Option<String>,
    #[serde(default)]
    gh_token: Option<String>,
}

/// Normalized credentials; any field may still be missing until
/// [`Credentials::validate`] has run
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub jira_token: Option<String>,
    pub jira_server: Option<String>,
    pub gh_token: Option<String>,
}

// Tokens stay out of logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("jira_token", &self.jira_token.as_ref().map(|_| "<redacted>"))
            .field("jira_server", &self.jira_server)
            .field("gh_token", &self.gh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Empty strings count as absent
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<RawSecret> for Credentials {
    fn from(raw: RawSecret) -> Self {
        Self {
            jira_token: non_empty(raw.cloud_team_jira_bot_token).or(non_empty(raw.jira_token)),
            jira_server: non_empty(raw.cloud_team_jira_server).or(non_empty(raw.jira_server)),
            gh_token: non_empty(raw.cloud_team_gh_token).or(non_empty(raw.gh_token)),
        }
    }
}

/// Credentials with every field present
#[derive(Clone, PartialEq, Eq)]
pub struct ValidCredentials {
    pub jira_token: String,
    pub jira_server: String,
    pub gh_token: String,
}

impl std::fmt::Debug for ValidCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidCredentials")
            .field("jira_token", &"<redacted>")
            .field("jira_server", &self.jira_server)
            .field("gh_token", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Parse a secret payload and normalize its keys
    pub fn from_json(payload: &str) -> Result<Self> {
        let raw: RawSecret = serde_json::from_str(payload)?;
        Ok(raw.into())
    }

    /// Names of the canonical fields that are missing
    pub fn missing(&self) -> Vec<String> {
        [
            (JIRA_TOKEN, &self.jira_token),
            (JIRA_SERVER, &self.jira_server),
            (GH_TOKEN, &self.gh_token),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name.to_string())
        .collect()
    }

    /// Require all three fields
    pub fn validate(self) -> Result<ValidCredentials> {
        match (self.jira_token, self.jira_server, self.gh_token) {
            (Some(jira_token), Some(jira_server), Some(gh_token)) => Ok(ValidCredentials {
                jira_token,
                jira_server,
                gh_token,
            }),
            (jira_token, jira_server, gh_token) => {
                Err(crate::SyncError::MissingCredentials(
                    Credentials {
                        jira_token,
                        jira_server,
                        gh_token,
                    }
                    .missing(),
                ))
            }
        }
    }
}

/// Fetch `secret_id` from `store` and normalize it
///
/// Fails when the store holds no payload for the identifier; missing fields
/// are left for [`Credentials::validate`].
pub async fn load_credentials(store: &dyn SecretStore, secret_id: &str) -> Result<Credentials> {
    let payload = store
        .get_secret_string(secret_id)
        .await?
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| {
            crate::SyncError::Config(format!("Secret '{}' has no string payload", secret_id))
        })?;

    let credentials = Credentials::from_json(&payload).map_err(|e| {
        crate::SyncError::Config(format!("Secret '{}' is not a JSON object: {}", secret_id, e))
    })?;

    tracing::debug!(secret_id = %secret_id, credentials = ?credentials, "Loaded credentials");
    Ok(credentials)
}
