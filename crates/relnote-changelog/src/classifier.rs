//! Change type classification
//!
//! A note's type comes from, in order of precedence:
//!
//! 1. the annotation on its release-note block,
//! 2. the first `kind/*` label of the pull request (labels sorted),
//! 3. text heuristics (bugfix, then update), falling back to `misc`.
//!
//! A type containing `breaking` is not a type at all: it only marks the
//! change as breaking, and resolution continues with the next source.

use relnote_core::PullRequest;
use tracing::trace;

use crate::parser::{is_breaking_change, is_bugfix, is_update};
use crate::types::ChangeType;

/// Label prefix carrying a change type
pub const KIND_LABEL_PREFIX: &str = "kind/";

/// Type hint extracted from one source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeHint {
    /// Declared type, if any
    pub change_type: Option<ChangeType>,
    /// Whether the source declared the change breaking
    pub breaking: bool,
}

impl TypeHint {
    /// Interpret a raw type string
    pub fn from_raw(raw: &str) -> Self {
        if raw.to_lowercase().contains("breaking") {
            return Self {
                change_type: None,
                breaking: true,
            };
        }

        Self {
            change_type: ChangeType::parse(raw),
            breaking: false,
        }
    }
}

/// Resolved classification of one note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub change_type: ChangeType,
    pub breaking: bool,
}

/// Type hint from the pull request's labels
pub fn label_hint(pull_request: &PullRequest) -> TypeHint {
    pull_request
        .labels
        .iter()
        .find_map(|label| label.strip_prefix(KIND_LABEL_PREFIX))
        .map(TypeHint::from_raw)
        .unwrap_or_default()
}

/// Classify a normalized note.
///
/// `annotation` is the raw annotation of the block the note came from.
pub fn classify(annotation: Option<&str>, labels: &TypeHint, text: &str) -> Classification {
    let block = annotation.map(TypeHint::from_raw).unwrap_or_default();

    let breaking = block.breaking || labels.breaking || is_breaking_change(text);

    let change_type = block
        .change_type
        .or_else(|| labels.change_type.clone())
        .unwrap_or_else(|| heuristic_type(text));

    trace!(%change_type, breaking, "classified release note");
    Classification {
        change_type,
        breaking,
    }
}

fn heuristic_type(text: &str) -> ChangeType {
    if is_bugfix(text) {
        ChangeType::Bugfix
    } else if is_update(text) {
        ChangeType::Update
    } else {
        ChangeType::Misc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pr_with_labels(labels: &[&str]) -> PullRequest {
        labels
            .iter()
            .fold(PullRequest::new(1, "title", ""), |pr, l| pr.with_label(*l))
    }

    #[test]
    fn test_annotation_wins_over_label() {
        let labels = label_hint(&pr_with_labels(&["kind/feature"]));
        let result = classify(Some("bugfix"), &labels, "Something");

        assert_eq!(result.change_type, ChangeType::Bugfix);
        assert!(!result.breaking);
    }

    #[test]
    fn test_label_wins_over_heuristics() {
        let labels = label_hint(&pr_with_labels(&["kind/feature"]));
        let result = classify(None, &labels, "Fix something");

        assert_eq!(result.change_type, ChangeType::Feature);
    }

    #[test]
    fn test_first_sorted_label_is_used() {
        let labels = label_hint(&pr_with_labels(&["kind/regression", "lgtm", "kind/bug"]));
        assert_eq!(labels.change_type, Some(ChangeType::Bugfix));
    }

    #[test]
    fn test_heuristics() {
        let none = TypeHint::default();

        assert_eq!(classify(None, &none, "Fix crash").change_type, ChangeType::Bugfix);
        assert_eq!(
            classify(None, &none, "Update Go to 1.22").change_type,
            ChangeType::Update
        );
        assert_eq!(
            classify(None, &none, "Improve performance").change_type,
            ChangeType::Misc
        );
    }

    #[test]
    fn test_breaking_annotation_only_sets_flag() {
        let labels = label_hint(&pr_with_labels(&["kind/api-change"]));
        let result = classify(Some("Breaking"), &labels, "Remove the v1 endpoint");

        assert_eq!(result.change_type, ChangeType::ApiChange);
        assert!(result.breaking);

        let result = classify(Some("breaking-change"), &TypeHint::default(), "Fix a thing");
        assert_eq!(result.change_type, ChangeType::Bugfix);
        assert!(result.breaking);
    }

    #[test]
    fn test_breaking_label_falls_through_to_heuristics() {
        let labels = label_hint(&pr_with_labels(&["kind/breaking"]));
        assert!(labels.breaking);

        let result = classify(None, &labels, "Update Cilium to 1.15");
        assert_eq!(result.change_type, ChangeType::Update);
        assert!(result.breaking);
    }

    #[test]
    fn test_breaking_text() {
        let result = classify(
            Some("feature"),
            &TypeHint::default(),
            "ACTION REQUIRED: new flag replaces the old one",
        );
        assert_eq!(result.change_type, ChangeType::Feature);
        assert!(result.breaking);
    }

    #[test]
    fn test_blank_annotation_is_ignored() {
        let labels = label_hint(&pr_with_labels(&["kind/documentation"]));
        let result = classify(Some("  "), &labels, "Describe the thing");
        assert_eq!(result.change_type, ChangeType::Documentation);
    }
}
