//! Markdown changelog formatter

use relnote_core::error::ChangelogError;
use tracing::{debug, instrument};

use super::ChangelogFormatter;
use crate::parser::remove_action_required;
use crate::types::{Change, Changelog};

const BREAKING_INTRO: &str = "This release contains changes that require additional attention, please read the following items carefully.";

/// Markdown changelog formatter
pub struct MarkdownFormatter {
    /// Link each change to its pull request
    pub include_links: bool,
}

impl MarkdownFormatter {
    /// Create a new markdown formatter
    pub fn new() -> Self {
        Self {
            include_links: true,
        }
    }

    /// Set whether pull request links are rendered
    pub fn with_links(mut self, include_links: bool) -> Self {
        self.include_links = include_links;
        self
    }

    fn item(&self, changelog: &Changelog, change: &Change, text: &str) -> String {
        let number = change.commit.pull_request.number;
        if self.include_links && number > 0 {
            format!(
                "- {} ([#{}]({}/pull/{}))\n",
                text, number, changelog.repository_url, number
            )
        } else {
            format!("- {}\n", text)
        }
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangelogFormatter for MarkdownFormatter {
    fn name(&self) -> &'static str {
        "markdown"
    }

    #[instrument(skip(self, changelog), fields(version = %changelog.version, group_count = changelog.groups.len()))]
    fn format(&self, changelog: &Changelog) -> Result<String, ChangelogError> {
        let mut output = String::new();

        output.push_str(&format!("## {}\n\n", changelog.version));
        output.push_str(&format!(
            "**GitHub release: [{version}]({url}/releases/tag/{version})**\n",
            version = changelog.version,
            url = changelog.repository_url
        ));

        let breaking = changelog.breaking_changes();
        if !breaking.is_empty() {
            output.push_str("\n### Breaking Changes\n\n");
            output.push_str(BREAKING_INTRO);
            output.push_str("\n\n");
            for change in breaking {
                let text = remove_action_required(&change.text);
                output.push_str(&self.item(changelog, change, &text));
            }
        }

        for group in &changelog.groups {
            output.push_str(&format!("\n### {}\n\n", group.title()));
            for change in &group.changes {
                output.push_str(&self.item(changelog, change, &change.text));
            }
        }

        debug!(output_len = output.len(), "markdown changelog formatted");
        Ok(output)
    }

    fn extension(&self) -> &'static str {
        "md"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChangeGroup, ChangeType};
    use relnote_core::{Commit, PullRequest};

    const URL: &str = "https://github.com/example/project";

    fn change(number: u64, change_type: ChangeType, breaking: bool, text: &str) -> Change {
        Change {
            commit: Commit::new("abc1234567890", "title", "someone")
                .with_pull_request(PullRequest::new(number, "title", "")),
            change_type,
            breaking,
            text: text.to_string(),
        }
    }

    fn changelog(groups: Vec<ChangeGroup>) -> Changelog {
        Changelog {
            version: "1.2.0".to_string(),
            repository_url: URL.to_string(),
            groups,
        }
    }

    #[test]
    fn test_format_basic() {
        let log = changelog(vec![
            ChangeGroup {
                change_type: ChangeType::Feature,
                changes: vec![change(10, ChangeType::Feature, false, "Add dashboard")],
            },
            ChangeGroup {
                change_type: ChangeType::Bugfix,
                changes: vec![change(11, ChangeType::Bugfix, false, "Fix crash")],
            },
        ]);

        let output = MarkdownFormatter::new().format(&log).unwrap();

        let expected = "## 1.2.0\n\n\
**GitHub release: [1.2.0](https://github.com/example/project/releases/tag/1.2.0)**\n\
\n### New Features\n\n\
- Add dashboard ([#10](https://github.com/example/project/pull/10))\n\
\n### Bugfixes\n\n\
- Fix crash ([#11](https://github.com/example/project/pull/11))\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_breaking_section() {
        let log = changelog(vec![ChangeGroup {
            change_type: ChangeType::ApiChange,
            changes: vec![change(
                7,
                ChangeType::ApiChange,
                true,
                "[ACTION REQUIRED] Rename field foo",
            )],
        }]);

        let output = MarkdownFormatter::new().format(&log).unwrap();

        assert!(output.contains("### Breaking Changes"));
        assert!(output.contains(BREAKING_INTRO));
        assert!(output.contains("- Rename field foo ([#7]"));
        // the full text stays in its group
        assert!(output.contains("- [ACTION REQUIRED] Rename field foo ([#7]"));
        assert!(output.find("### Breaking Changes") < output.find("### API Changes"));
    }

    #[test]
    fn test_no_breaking_section_without_breaking_changes() {
        let log = changelog(vec![ChangeGroup {
            change_type: ChangeType::Misc,
            changes: vec![change(1, ChangeType::Misc, false, "Tweak")],
        }]);

        let output = MarkdownFormatter::new().format(&log).unwrap();
        assert!(!output.contains("Breaking Changes"));
        assert!(output.contains("### Miscellaneous"));
    }

    #[test]
    fn test_without_links() {
        let log = changelog(vec![ChangeGroup {
            change_type: ChangeType::Misc,
            changes: vec![change(1, ChangeType::Misc, false, "Tweak")],
        }]);

        let output = MarkdownFormatter::new().with_links(false).format(&log).unwrap();
        assert!(output.ends_with("- Tweak\n"));
    }
}
