//! Repository classification
//!
//! Maps a repository short-name to the Jira labels and components applied to
//! every item mirrored from it.

use serde::{Deserialize, Serialize};

/// Labels and components applied to a mirrored issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub labels: Vec<String>,
    pub components: Vec<String>,
}

impl Classification {
    pub fn new(labels: &[&str], components: &[&str]) -> Self {
        Self {
            labels: labels.iter().map(|s| s.to_string()).collect(),
            components: components.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A membership rule: repositories whose short-name is listed get the
/// rule's classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRule {
    /// Repository short-names (owner stripped)
    pub repositories: Vec<String>,

    #[serde(flatten)]
    pub classification: Classification,
}

impl ClassificationRule {
    pub fn new(repositories: &[&str], labels: &[&str], components: &[&str]) -> Self {
        Self {
            repositories: repositories.iter().map(|s| s.to_string()).collect(),
            classification: Classification::new(labels, components),
        }
    }

    fn matches(&self, short_name: &str) -> bool {
        self.repositories.iter().any(|r| r == short_name)
    }
}

/// Ordered rule table, first match wins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classifier {
    #[serde(default = "default_rules")]
    pub rules: Vec<ClassificationRule>,

    /// Applied when no rule matches
    #[serde(default = "default_classification")]
    pub default: Classification,
}

fn default_rules() -> Vec<ClassificationRule> {
    vec![
        ClassificationRule::new(
            &[
                "amazon.aws",
                "community.aws",
                "cloud.aws_ops",
                "cloud.aws_troubleshooting",
            ],
            &["github", "aws"],
            &["cloud-content", "Public Cloud"],
        ),
        ClassificationRule::new(
            &["cloud.gcp_ops"],
            &["github", "gcp"],
            &["cloud-content", "Public Cloud"],
        ),
        ClassificationRule::new(
            &["kubernetes.core", "community.okd"],
            &["github", "kubernetes"],
            &["cloud-content", "Container Native"],
        ),
        // vmware.vmware_rest is not scanned today; kept so it classifies
        // correctly once it is added back to the repository list.
        ClassificationRule::new(
            &["vmware.vmware_rest"],
            &["github", "vmware"],
            &["cloud-content", "Private Cloud"],
        ),
    ]
}

fn default_classification() -> Classification {
    Classification::new(&["github"], &["cloud-content"])
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            rules: default_rules(),
            default: default_classification(),
        }
    }
}

impl Classifier {
    pub fn new(rules: Vec<ClassificationRule>, default: Classification) -> Self {
        Self { rules, default }
    }

    /// Classify a repository by identifier (`owner/name`) or bare short-name
    pub fn classify(&self, repository: &str) -> &Classification {
        let name = short_name(repository);
        self.rules
            .iter()
            .find(|rule| rule.matches(name))
            .map(|rule| &rule.classification)
            .unwrap_or(&self.default)
    }
}

/// Strip the owner from a repository identifier: `owner/name` -> `name`
pub fn short_name(repository: &str) -> &str {
    repository
        .split_once('/')
        .map(|(_, name)| name)
        .unwrap_or(repository)
}
