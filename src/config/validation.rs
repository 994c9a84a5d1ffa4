//! Configuration validation
//!
//! Checks a [`SyncConfig`] before any remote call is made:
//! - At least one repository, each of the form `owner/name`, no duplicates
//! - Valid GitHub URL
//! - Non-empty labels, project and transition name
//! - A usable search cap and custom field id

use super::sync_config::SyncConfig;
use std::collections::HashSet;

/// Validation error details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

/// Validate a sync configuration
pub fn validate_config(config: &SyncConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if config.repositories.is_empty() {
        errors.push(ValidationError::new(
            "repositories",
            "At least one repository must be listed",
        ));
    }

    let mut seen = HashSet::new();
    for repo in &config.repositories {
        if !is_valid_repository(repo) {
            errors.push(ValidationError::new(
                "repositories",
                format!("Invalid repository '{}', expected owner/name", repo),
            ));
        }
        if !seen.insert(repo) {
            errors.push(ValidationError::new(
                "repositories",
                format!("Duplicate repository: {}", repo),
            ));
        }
    }

    if !config.github.url.starts_with("http://") && !config.github.url.starts_with("https://") {
        errors.push(ValidationError::new(
            "github.url",
            format!("Invalid GitHub URL: {}", config.github.url),
        ));
    }

    if config.source_label.trim().is_empty() {
        errors.push(ValidationError::new(
            "source_label",
            "Source label cannot be empty",
        ));
    }

    let jira = &config.jira;
    if jira.project.trim().is_empty() {
        errors.push(ValidationError::new(
            "jira.project",
            "JIRA project key cannot be empty",
        ));
    }

    if jira.tracker_label.trim().is_empty() {
        errors.push(ValidationError::new(
            "jira.tracker_label",
            "Tracker label cannot be empty",
        ));
    }

    if jira.max_results == 0 {
        errors.push(ValidationError::new(
            "jira.max_results",
            "Result cap must be greater than 0",
        ));
    }

    if !jira.workstream_field.starts_with("customfield_") {
        errors.push(ValidationError::new(
            "jira.workstream_field",
            format!(
                "Invalid custom field id '{}', expected customfield_<id>",
                jira.workstream_field
            ),
        ));
    }

    if jira.target_status.trim().is_empty() {
        errors.push(ValidationError::new(
            "jira.target_status",
            "Target transition cannot be empty",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `owner/name`, both parts non-empty, no further separators
fn is_valid_repository(repo: &str) -> bool {
    match repo.split_once('/') {
        Some((owner, name)) => !owner.is_empty() && !name.is_empty() && !name.contains('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&SyncConfig::default()).is_ok());
    }

    #[test]
    fn test_repository_format() {
        assert!(is_valid_repository("ansible-collections/amazon.aws"));
        assert!(!is_valid_repository("amazon.aws"));
        assert!(!is_valid_repository("/amazon.aws"));
        assert!(!is_valid_repository("owner/"));
        assert!(!is_valid_repository("a/b/c"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = SyncConfig::default();
        config.repositories = vec!["org/a".to_string(), "org/a".to_string(), "bad".to_string()];
        config.jira.max_results = 0;
        config.jira.workstream_field = "12319275".to_string();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "repositories",
                "repositories",
                "jira.max_results",
                "jira.workstream_field",
            ]
        );
    }

    #[test]
    fn test_empty_repository_list() {
        let mut config = SyncConfig::default();
        config.repositories.clear();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "repositories: At least one repository must be listed"
        );
    }

    #[test]
    fn test_validate_maps_to_config_error() {
        let mut config = SyncConfig::default();
        config.github.url = "github.com".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("Invalid GitHub URL"));
    }
}
