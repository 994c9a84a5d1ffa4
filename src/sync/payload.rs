//! Create payload for a mirrored issue

use super::classifier::{short_name, Classification};
use crate::config::JiraSettings;
use crate::integrations::{IdRef, NameRef, NewIssueFields, ProjectRef, SourceIssue};

pub const DOD_TITLE: &str = "Definition of Done";

pub const DOD_CONTENT: &str = "
* Code Quality: Code adheres to team coding standards and is well-documented.
* Testing: All tests pass successfully, and relevant tests are updated.
* Review and Approval: PR has been reviewed, and feedback has been addressed.
* Documentation: Relevant documentation has been updated (e.g., README, release notes).
* Functionality: Code meets requirements and works as expected without regressions.
* Merging: PR is up to date with the base branch and free of merge conflicts.
* Backporting: Relevant backport labels are added based on the nature of the fix, and backported PRs are approved and merged.
";

/// `[{short-name}/{number}] {title}`
pub fn summary(issue: &SourceIssue) -> String {
    format!(
        "[{}/{}] {}",
        short_name(&issue.repository),
        issue.number,
        issue.title
    )
}

/// Description in Jira wiki markup. Must embed `html_url`: the next run
/// finds the item again through it.
pub fn description(issue: &SourceIssue) -> String {
    format!(
        "This issue is created from the GitHub issue by github-to-jira-utility running in Lambda. \n {} \n {} \n h3. {} \n {}",
        issue.html_url,
        issue.body.as_deref().unwrap_or(""),
        DOD_TITLE,
        DOD_CONTENT
    )
}

pub fn build_fields(
    issue: &SourceIssue,
    classification: &Classification,
    settings: &JiraSettings,
) -> NewIssueFields {
    let mut custom_fields = serde_json::Map::new();
    custom_fields.insert(
        settings.workstream_field.clone(),
        serde_json::json!([{ "value": settings.workstream_value }]),
    );

    NewIssueFields {
        project: ProjectRef {
            key: settings.project.clone(),
        },
        summary: summary(issue),
        description: description(issue),
        issue_type: NameRef {
            name: settings.issue_type.clone(),
        },
        labels: classification.labels.clone(),
        priority: NameRef {
            name: settings.priority.clone(),
        },
        components: classification
            .components
            .iter()
            .map(|name| NameRef { name: name.clone() })
            .collect(),
        versions: vec![IdRef {
            id: settings.fix_version_id.clone(),
        }],
        custom_fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::Classifier;

    fn issue(body: Option<&str>) -> SourceIssue {
        SourceIssue {
            repository: "ansible-collections/community.aws".to_string(),
            number: 42,
            title: "Fix EC2 tagging".to_string(),
            body: body.map(String::from),
            html_url: "https://github.com/ansible-collections/community.aws/issues/42"
                .to_string(),
            labels: vec!["jira".to_string()],
        }
    }

    #[test]
    fn test_summary_uses_short_name() {
        assert_eq!(summary(&issue(None)), "[community.aws/42] Fix EC2 tagging");
    }

    #[test]
    fn test_description_template() {
        let text = description(&issue(Some("See logs")));
        assert!(text.starts_with(
            "This issue is created from the GitHub issue by github-to-jira-utility running in Lambda. \n \
             https://github.com/ansible-collections/community.aws/issues/42 \n See logs \n h3. Definition of Done \n "
        ));
        assert!(text.ends_with(DOD_CONTENT));
    }

    #[test]
    fn test_description_without_body() {
        let text = description(&issue(None));
        assert!(text.contains("/issues/42 \n  \n h3. Definition of Done"));
    }

    #[test]
    fn test_build_fields() {
        let classifier = Classifier::default();
        let source = issue(Some("See logs"));
        let fields = build_fields(
            &source,
            classifier.classify(&source.repository),
            &JiraSettings::default(),
        );

        assert_eq!(fields.project.key, "ACA");
        assert_eq!(fields.issue_type.name, "Bug");
        assert_eq!(fields.priority.name, "Undefined");
        assert_eq!(fields.labels, vec!["github", "aws"]);
        let components: Vec<_> = fields.components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(components, vec!["cloud-content", "Public Cloud"]);
        assert_eq!(fields.versions[0].id, "12398634");

        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(
            json["customfield_12319275"],
            serde_json::json!([{"value": "Cloud Content"}])
        );
    }
}
