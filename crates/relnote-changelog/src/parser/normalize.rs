//! Text normalization and heuristics for release-note items

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

const ITEM_PREFIXES: [&str; 2] = ["- ", "* "];

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

/// `updat(es|ed|ing|e) [<target>] [version] to <value>` at the end of the text
static UPDATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)updat(?:es|ed|ing|e)(?:\s+.+?)?(?:\s+version)?\s+to\s+.+$")
        .expect("Invalid regex")
});

static ACTION_REQUIRED_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:\*\*|\[)?\s*action required\s*(?:\*\*|\])?\s*:?\s*")
        .expect("Invalid regex")
});

/// Verb forms rewritten to the imperative when they start a note
static PREFIX_REPLACEMENTS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("Fixes", "Fix"),
        ("Fixed", "Fix"),
        ("Fixing", "Fix"),
        ("Adds", "Add"),
        ("Added", "Add"),
        ("Adding", "Add"),
        ("Updates", "Update"),
        ("Updated", "Update"),
        ("Updating", "Update"),
        ("Upgrade", "Update"),
        ("Upgrades", "Update"),
        ("Upgraded", "Update"),
        ("Upgrading", "Update"),
        ("Bump", "Update"),
        ("Bumps", "Update"),
        ("Bumped", "Update"),
        ("Bumping", "Update"),
        ("Changes", "Change"),
        ("Changed", "Change"),
        ("Changing", "Change"),
        ("Replaces", "Replace"),
        ("Replaced", "Replace"),
        ("Replacing", "Replace"),
        ("Removes", "Remove"),
        ("Removed", "Remove"),
        ("Removing", "Remove"),
        ("Deprecates", "Deprecate"),
        ("Deprecated", "Deprecate"),
        ("Deprecating", "Deprecate"),
    ])
});

/// Split block content into candidate items.
///
/// If every non-blank line is a list item, each becomes its own item with the
/// marker stripped. Otherwise the block is a single paragraph and is
/// collapsed onto one line.
pub fn split_items(content: &str) -> Vec<String> {
    let mut items = Vec::new();

    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        let stripped = ITEM_PREFIXES
            .iter()
            .find_map(|prefix| line.strip_prefix(prefix));

        match stripped {
            Some(item) => items.push(item.trim().to_string()),
            None => {
                let collapsed = WHITESPACE_REGEX.replace_all(content.trim(), " ");
                return vec![collapsed.into_owned()];
            }
        }
    }

    items
}

/// Normalize one item: strip a trailing period, capitalize, harmonize the
/// leading verb. Applying it twice gives the same result as applying it once
/// for any text that does not end in several periods.
pub fn normalize_item(item: &str) -> String {
    let item = item.trim();
    let item = item.strip_suffix('.').unwrap_or(item);
    harmonize_prefix(&capitalize(item))
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Rewrite a leading verb (`Fixed`, `Bumps`, ...) to its imperative form.
/// Only the first word is considered, and only when followed by a space.
pub fn harmonize_prefix(text: &str) -> String {
    if let Some((first, rest)) = text.split_once(' ') {
        if let Some(replacement) = PREFIX_REPLACEMENTS.get(first) {
            return format!("{} {}", replacement, rest);
        }
    }

    text.to_string()
}

/// Whether the text announces a change consumers must act on
pub fn is_breaking_change(text: &str) -> bool {
    let text = text.to_lowercase();
    text.contains("action required") || text.contains("breaking change")
}

/// Whether a normalized note describes a bug fix
pub fn is_bugfix(text: &str) -> bool {
    text.starts_with("Fix ")
}

/// Whether a note describes updating a component or dependency
pub fn is_update(text: &str) -> bool {
    UPDATE_REGEX.is_match(text)
}

/// Strip a leading "action required" marker (`Action required:`,
/// `**ACTION REQUIRED**:`, `[Action Required]`, ...). The breaking changes
/// section already says so.
pub fn remove_action_required(text: &str) -> String {
    ACTION_REQUIRED_REGEX.replace(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_update() {
        let cases = [
            "Update OSM to v1.5.2; fixing cloud-init bootstrapping issues on Ubuntu 22.04 on Azure",
            "updates operating-system-manager to v1.5.1.",
            "update Metering to v1.2.1.",
            "Updated to Go 1.22.2",
            "Update Cilium to 1.14.9 and 1.13.14",
            "updating to Kubernetes 1.29",
            "Update Vertical Pod Autoscaler to 1.0",
            "Update etcd version to 3.5.12",
        ];

        for text in cases {
            assert!(is_update(text), "expected {text:?} to be an update");
        }
    }

    #[test]
    fn test_is_not_update() {
        let cases = [
            "Fix update of machine deployments",
            "Add support for updating clusters",
            "Update documentation",
            "Change the default timeout",
        ];

        for text in cases {
            assert!(!is_update(text), "expected {text:?} not to be an update");
        }
    }

    #[test]
    fn test_remove_action_required() {
        let cases = [
            (
                "Action required: if you use `velero.restic.deploy: true`...",
                "if you use `velero.restic.deploy: true`...",
            ),
            (
                "**ACTION REQUIRED**: For velero helm chart upgrade. If running...",
                "For velero helm chart upgrade. If running...",
            ),
            (
                "Action required: [User-mla] If you had copied `values.yaml...",
                "[User-mla] If you had copied `values.yaml...",
            ),
            (
                "[ACTION REQUIRED] KubeLB: The prefix for the tenant namespaces created...",
                "KubeLB: The prefix for the tenant namespaces created...",
            ),
            (
                "[Action Required] The field `ovdcNetwork` in `cluster` and `preset...",
                "The field `ovdcNetwork` in `cluster` and `preset...",
            ),
            (
                "Nothing to see here, action required later",
                "Nothing to see here, action required later",
            ),
        ];

        for (input, expected) in cases {
            assert_eq!(remove_action_required(input), expected);
        }
    }

    #[test]
    fn test_harmonize_prefix() {
        assert_eq!(harmonize_prefix("Fixed crash on startup"), "Fix crash on startup");
        assert_eq!(harmonize_prefix("Bumps etcd to 3.5"), "Update etcd to 3.5");
        assert_eq!(harmonize_prefix("Deprecating the old API"), "Deprecate the old API");
        // only the very first word, only once
        assert_eq!(
            harmonize_prefix("Removed feature that Fixed things"),
            "Remove feature that Fixed things"
        );
        // whole-word match only
        assert_eq!(harmonize_prefix("Fixedness matters"), "Fixedness matters");
        assert_eq!(harmonize_prefix("Fixed"), "Fixed");
    }

    #[test]
    fn test_normalize_item() {
        assert_eq!(normalize_item("added a thing."), "Add a thing");
        assert_eq!(normalize_item("  fixes #123  "), "Fix #123");
        assert_eq!(normalize_item("Version 1.2.3"), "Version 1.2.3");
        assert_eq!(normalize_item("über cool"), "Über cool");
        assert_eq!(normalize_item(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for text in ["Add a thing", "Fix it", "Update Go to 1.22", "misc stuff.", "Bumped x"] {
            let once = normalize_item(text);
            assert_eq!(normalize_item(&once), once);
        }
    }

    #[test]
    fn test_split_list_items() {
        let items = split_items("- first\n* second\n\n- third");
        assert_eq!(items, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_split_paragraph() {
        let items = split_items("This is a long note\nthat spans   several\nlines");
        assert_eq!(items, vec!["This is a long note that spans several lines"]);
    }

    #[test]
    fn test_split_mixed_content_is_a_paragraph() {
        let items = split_items("Some intro:\n- first\n- second");
        assert_eq!(items, vec!["Some intro: - first - second"]);
    }

    #[test]
    fn test_breaking_change_detection() {
        assert!(is_breaking_change("ACTION REQUIRED: migrate your config"));
        assert!(is_breaking_change("This is a Breaking Change for users of X"));
        assert!(!is_breaking_change("Break the loop early"));
    }

    #[test]
    fn test_is_bugfix() {
        assert!(is_bugfix("Fix crash"));
        assert!(!is_bugfix("fix crash"));
        assert!(!is_bugfix("Fixture cleanup"));
    }
}
