//! Configuration system
//!
//! - Job settings ([`SyncConfig`]): repositories, classification rules and
//!   Jira constants, defaulted to the stock job and overridable from YAML
//! - Credentials: loaded from a [`SecretStore`] and normalized across the
//!   two secret key conventions

mod credentials;
mod secrets;
mod sync_config;
pub mod validation;

pub use credentials::{load_credentials, Credentials, RawSecret, ValidCredentials};
pub use secrets::{AwsSecretStore, EnvSecretStore, FileSecretStore, SecretStore};
pub use sync_config::{GitHubSettings, JiraSettings, SyncConfig, DEFAULT_REPOSITORIES};
pub use validation::{validate_config, ValidationError};
