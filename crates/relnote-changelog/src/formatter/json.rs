//! JSON changelog formatter

use relnote_core::error::ChangelogError;
use serde::Serialize;

use super::ChangelogFormatter;
use crate::types::{Change, ChangeType, Changelog};

/// JSON changelog formatter
#[derive(Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

#[derive(Serialize)]
struct JsonChangelog<'a> {
    version: &'a str,
    repository_url: &'a str,
    breaking_changes: Vec<&'a Change>,
    groups: Vec<JsonGroup<'a>>,
}

#[derive(Serialize)]
struct JsonGroup<'a> {
    #[serde(rename = "type")]
    change_type: &'a ChangeType,
    title: String,
    changes: &'a [Change],
}

impl ChangelogFormatter for JsonFormatter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn format(&self, changelog: &Changelog) -> Result<String, ChangelogError> {
        let document = JsonChangelog {
            version: &changelog.version,
            repository_url: &changelog.repository_url,
            breaking_changes: changelog.breaking_changes(),
            groups: changelog
                .groups
                .iter()
                .map(|g| JsonGroup {
                    change_type: &g.change_type,
                    title: g.title(),
                    changes: &g.changes,
                })
                .collect(),
        };

        serde_json::to_string_pretty(&document).map_err(|e| ChangelogError::RenderFailed {
            format: self.name().to_string(),
            reason: e.to_string(),
        })
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChangeGroup;
    use relnote_core::{Commit, PullRequest};

    #[test]
    fn test_format_json() {
        let change = Change {
            commit: Commit::new("abc1234567890", "title", "someone")
                .with_pull_request(PullRequest::new(42, "title", "body").with_label("kind/api-change")),
            change_type: ChangeType::ApiChange,
            breaking: true,
            text: "Rename field".to_string(),
        };
        let changelog = Changelog {
            version: "2.0.0".to_string(),
            repository_url: "https://github.com/example/project".to_string(),
            groups: vec![ChangeGroup {
                change_type: ChangeType::ApiChange,
                changes: vec![change],
            }],
        };

        let output = JsonFormatter::new().format(&changelog).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["version"], "2.0.0");
        assert_eq!(value["groups"][0]["type"], "api-change");
        assert_eq!(value["groups"][0]["title"], "API Changes");
        assert_eq!(value["groups"][0]["changes"][0]["text"], "Rename field");
        assert_eq!(value["groups"][0]["changes"][0]["commit"]["pull_request"]["number"], 42);
        assert_eq!(value["breaking_changes"].as_array().map(Vec::len), Some(1));
    }
}
