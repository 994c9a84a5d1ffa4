//! Secret stores
//!
//! A secret is a JSON string looked up by identifier. Backends: AWS Secrets
//! Manager, mounted secret files and environment variables.

use crate::{Result, SyncError};
use async_trait::async_trait;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use std::path::PathBuf;

/// Source of raw secret payloads
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// The payload stored under `secret_id`, or `None` if there is none
    async fn get_secret_string(&self, secret_id: &str) -> Result<Option<String>>;
}

/// Reads `<dir>/<secret_id>`, the layout used for mounted secrets
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    dir: PathBuf,
}

impl FileSecretStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn secret_path(&self, secret_id: &str) -> Result<PathBuf> {
        // Identifiers are single path components
        if secret_id.is_empty()
            || secret_id.contains('/')
            || secret_id.contains('\\')
            || secret_id == "."
            || secret_id == ".."
        {
            return Err(SyncError::Config(format!(
                "Invalid secret identifier: '{}'",
                secret_id
            )));
        }
        Ok(self.dir.join(secret_id))
    }
}

#[async_trait]
impl SecretStore for FileSecretStore {
    async fn get_secret_string(&self, secret_id: &str) -> Result<Option<String>> {
        let path = self.secret_path(secret_id)?;
        tracing::debug!(path = %path.display(), "Reading secret file");
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Reads the environment variable named after the secret identifier
///
/// `cloud_team_jira_login` is looked up as `CLOUD_TEAM_JIRA_LOGIN`.
#[derive(Debug, Clone, Default)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    pub fn variable_name(secret_id: &str) -> String {
        secret_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn get_secret_string(&self, secret_id: &str) -> Result<Option<String>> {
        let name = Self::variable_name(secret_id);
        tracing::debug!(variable = %name, "Reading secret from environment");
        match std::env::var(&name) {
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(std::env::VarError::NotUnicode(_)) => Err(SyncError::Config(format!(
                "Secret variable {} is not valid UTF-8",
                name
            ))),
        }
    }
}

/// Reads `SecretString` from AWS Secrets Manager
///
/// A secret holding only `SecretBinary` yields `None`, as does an unknown
/// secret id.
#[derive(Debug, Clone)]
pub struct AwsSecretStore {
    client: aws_sdk_secretsmanager::Client,
}

impl AwsSecretStore {
    pub fn new(client: aws_sdk_secretsmanager::Client) -> Self {
        Self { client }
    }

    /// Build a client from the standard AWS environment (region, credential
    /// chain, profile)
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(aws_sdk_secretsmanager::Client::new(&config))
    }
}

#[async_trait]
impl SecretStore for AwsSecretStore {
    async fn get_secret_string(&self, secret_id: &str) -> Result<Option<String>> {
        tracing::debug!(secret_id = %secret_id, "Reading secret from Secrets Manager");

        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await;

        match output {
            Ok(output) => Ok(output.secret_string().map(String::from)),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_not_found_exception()) =>
            {
                Ok(None)
            }
            Err(err) => Err(SyncError::Integration(format!(
                "Secrets Manager error reading '{}': {}",
                secret_id,
                DisplayErrorContext(&err)
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_variable_name() {
        assert_eq!(
            EnvSecretStore::variable_name("cloud_team_jira_login"),
            "CLOUD_TEAM_JIRA_LOGIN"
        );
        assert_eq!(
            EnvSecretStore::variable_name("prod/github-jira"),
            "PROD_GITHUB_JIRA"
        );
    }

    #[tokio::test]
    async fn test_env_store() {
        std::env::set_var("GH2JIRA_SECRETS_TEST_PAYLOAD", "{\"gh_token\": \"x\"}");
        let store = EnvSecretStore;
        assert_eq!(
            store
                .get_secret_string("gh2jira-secrets-test-payload")
                .await
                .unwrap()
                .as_deref(),
            Some("{\"gh_token\": \"x\"}")
        );
        assert_eq!(
            store
                .get_secret_string("gh2jira_secrets_test_absent")
                .await
                .unwrap(),
            None
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_env_store_rejects_non_utf8() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        std::env::set_var(
            "GH2JIRA_SECRETS_TEST_BINARY",
            OsStr::from_bytes(&[0x7b, 0xff, 0x7d]),
        );
        let err = EnvSecretStore
            .get_secret_string("gh2jira_secrets_test_binary")
            .await
            .unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("GH2JIRA_SECRETS_TEST_BINARY"));
        assert!(err.to_string().contains("UTF-8"));
    }

    #[tokio::test]
    async fn test_file_store() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("jira_login"), "{}").unwrap();

        let store = FileSecretStore::new(dir.path());
        assert_eq!(
            store.get_secret_string("jira_login").await.unwrap().as_deref(),
            Some("{}")
        );
        assert_eq!(store.get_secret_string("other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_rejects_paths() {
        let store = FileSecretStore::new("/run/secrets");
        let err = store.get_secret_string("../etc/passwd").await.unwrap_err();
        assert!(err.is_config());
    }
}
