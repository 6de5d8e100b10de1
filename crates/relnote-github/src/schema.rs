//! GraphQL queries and response shapes

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer};

use relnote_core::{Commit, PullRequest, Ref};

pub(crate) const HISTORY_QUERY: &str = r#"
query History($owner: String!, $name: String!, $head: String!, $cursor: String) {
  repository(owner: $owner, name: $name) {
    object(expression: $head) {
      ... on Commit {
        history(first: 50, after: $cursor) {
          nodes {
            oid
            messageHeadline
            associatedPullRequests(first: 5) {
              nodes {
                number
                title
                body
                author { login }
                labels(first: 50) { nodes { name } }
              }
            }
          }
          pageInfo { endCursor hasNextPage }
        }
      }
    }
  }
}
"#;

pub(crate) const REFS_QUERY: &str = r#"
query References($owner: String!, $name: String!, $prefix: String!, $cursor: String) {
  repository(owner: $owner, name: $name) {
    defaultBranchRef { name }
    refs(first: 50, refPrefix: $prefix, after: $cursor) {
      nodes {
        name
        target {
          oid
          ... on Tag { target { oid } }
        }
      }
      pageInfo { endCursor hasNextPage }
    }
  }
}
"#;

pub(crate) const PULL_REQUEST_QUERY: &str = r#"
query PullRequest($owner: String!, $name: String!, $number: Int!) {
  repository(owner: $owner, name: $name) {
    pullRequest(number: $number) {
      number
      title
      body
      author { login }
      labels(first: 50) { nodes { name } }
    }
  }
}
"#;

/// Connections and lists come back as `null` when GitHub cannot resolve them
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// GraphQL response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct Response<T> {
    pub data: Option<T>,
    #[serde(default, deserialize_with = "nullable")]
    pub errors: Vec<ResponseError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryData<T> {
    pub repository: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageInfo {
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

impl PageInfo {
    /// Cursor of the next page, `None` on the last page
    pub fn next_cursor(self) -> Option<String> {
        if self.has_next_page {
            self.end_cursor
        } else {
            None
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct Nodes<T> {
    #[serde(default, deserialize_with = "nullable")]
    pub nodes: Vec<T>,
}

impl<T> Default for Nodes<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

// history

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryRepository {
    pub object: Option<HistoryObject>,
}

/// `history` is absent when the expression names something other than a commit
#[derive(Debug, Deserialize)]
pub(crate) struct HistoryObject {
    pub history: Option<HistoryConnection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HistoryConnection {
    #[serde(default, deserialize_with = "nullable")]
    pub nodes: Vec<CommitNode>,
    #[serde(default, deserialize_with = "nullable")]
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommitNode {
    pub oid: String,
    #[serde(default, deserialize_with = "nullable")]
    pub message_headline: String,
    #[serde(default, deserialize_with = "nullable")]
    pub associated_pull_requests: Nodes<PullRequestNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PullRequestNode {
    pub number: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub body: String,
    pub author: Option<Actor>,
    #[serde(default, deserialize_with = "nullable")]
    pub labels: Nodes<Label>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PullRequestRepository {
    pub pull_request: Option<PullRequestNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Actor {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Label {
    pub name: String,
}

impl PullRequestNode {
    /// Split into the pull request and its author's login (empty for
    /// deleted accounts)
    pub fn into_parts(self) -> (PullRequest, String) {
        let author = self.author.map(|a| a.login).unwrap_or_default();
        let pull_request = PullRequest {
            number: self.number,
            title: self.title,
            body: self.body,
            labels: self.labels.nodes.into_iter().map(|l| l.name).collect::<BTreeSet<_>>(),
        };

        (pull_request, author)
    }
}

impl CommitNode {
    /// Convert to a commit, using the first associated pull request.
    ///
    /// A commit without pull request gets a default one and no author.
    pub fn into_commit(self) -> Commit {
        let mut commit = Commit::new(self.oid, self.message_headline, "");

        if let Some(pr) = self.associated_pull_requests.nodes.into_iter().next() {
            let (pull_request, author) = pr.into_parts();
            commit.pull_request = pull_request;
            commit.author = author;
        }

        commit
    }
}

// references

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefsRepository {
    pub default_branch_ref: Option<NamedRef>,
    pub refs: Option<RefConnection>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NamedRef {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefConnection {
    #[serde(default, deserialize_with = "nullable")]
    pub nodes: Vec<RefNode>,
    #[serde(default, deserialize_with = "nullable")]
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RefNode {
    pub name: String,
    pub target: Option<RefTarget>,
}

/// For a tag, `oid` is the tag object; the commit is `target.oid`
#[derive(Debug, Deserialize)]
pub(crate) struct RefTarget {
    pub oid: String,
    pub target: Option<TagTarget>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagTarget {
    pub oid: String,
}

/// Kind of a ref listed under `refs/`
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum RefKind {
    Branch(Ref),
    Tag(Ref),
}

impl RefNode {
    /// Classify by `heads/` or `tags/` prefix; other refs are ignored
    pub fn into_ref(self) -> Option<RefKind> {
        let target = self.target?;
        let hash = target.target.map(|t| t.oid).unwrap_or(target.oid);

        if let Some(name) = self.name.strip_prefix("heads/") {
            Some(RefKind::Branch(Ref::new(name, hash)))
        } else {
            self.name
                .strip_prefix("tags/")
                .map(|name| RefKind::Tag(Ref::new(name, hash)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_commit_with_pull_request() {
        let node: CommitNode = serde_json::from_value(json!({
            "oid": "abc123",
            "messageHeadline": "Add the thing (#12)",
            "associatedPullRequests": {
                "nodes": [
                    {
                        "number": 12,
                        "title": "Add the thing",
                        "body": "```release-note\nAdd the thing\n```",
                        "author": { "login": "someone" },
                        "labels": { "nodes": [{ "name": "kind/feature" }, { "name": "approved" }] }
                    },
                    {
                        "number": 13,
                        "title": "Backport",
                        "body": "",
                        "author": { "login": "bot" },
                        "labels": { "nodes": [] }
                    }
                ]
            }
        }))
        .unwrap();

        let commit = node.into_commit();
        assert_eq!(commit.hash, "abc123");
        assert_eq!(commit.title, "Add the thing (#12)");
        assert_eq!(commit.author, "someone");
        assert_eq!(commit.pull_request.number, 12);
        assert!(commit.pull_request.labels.contains("kind/feature"));
        assert_eq!(commit.pull_request.labels.len(), 2);
    }

    #[test]
    fn test_commit_without_pull_request() {
        let node: CommitNode = serde_json::from_value(json!({
            "oid": "abc123",
            "messageHeadline": "Direct push",
            "associatedPullRequests": { "nodes": [] }
        }))
        .unwrap();

        let commit = node.into_commit();
        assert_eq!(commit.pull_request.number, 0);
        assert_eq!(commit.author, "");
    }

    #[test]
    fn test_deleted_author() {
        let node: CommitNode = serde_json::from_value(json!({
            "oid": "abc123",
            "messageHeadline": "Old change",
            "associatedPullRequests": {
                "nodes": [{ "number": 1, "title": "t", "body": "b", "author": null, "labels": { "nodes": [] } }]
            }
        }))
        .unwrap();

        assert_eq!(node.into_commit().author, "");
    }

    #[test]
    fn test_null_connections_are_empty() {
        let node: CommitNode = serde_json::from_value(json!({
            "oid": "abc123",
            "messageHeadline": "Direct push",
            "associatedPullRequests": null
        }))
        .unwrap();
        assert_eq!(node.into_commit().pull_request.number, 0);

        let node: CommitNode = serde_json::from_value(json!({
            "oid": "abc123",
            "messageHeadline": "Add it (#7)",
            "associatedPullRequests": {
                "nodes": [{ "number": 7, "title": "Add it", "body": null, "author": null, "labels": null }]
            }
        }))
        .unwrap();
        let commit = node.into_commit();
        assert_eq!(commit.pull_request.number, 7);
        assert_eq!(commit.pull_request.body, "");
        assert!(commit.pull_request.labels.is_empty());

        let labels: Nodes<Label> = serde_json::from_value(json!({ "nodes": null })).unwrap();
        assert!(labels.nodes.is_empty());

        let history: HistoryConnection = serde_json::from_value(json!({
            "nodes": null,
            "pageInfo": { "endCursor": null, "hasNextPage": false }
        }))
        .unwrap();
        assert!(history.nodes.is_empty());
    }

    #[test]
    fn test_ref_kinds() {
        let nodes: Vec<RefNode> = serde_json::from_value(json!([
            { "name": "heads/main", "target": { "oid": "c1" } },
            { "name": "tags/v1.0.0", "target": { "oid": "tagobj", "target": { "oid": "c2" } } },
            { "name": "tags/v0.9.0", "target": { "oid": "c3" } },
            { "name": "pull/1/head", "target": { "oid": "c4" } }
        ]))
        .unwrap();

        let refs: Vec<_> = nodes.into_iter().filter_map(RefNode::into_ref).collect();
        assert_eq!(
            refs,
            vec![
                RefKind::Branch(Ref::new("main", "c1")),
                RefKind::Tag(Ref::new("v1.0.0", "c2")),
                RefKind::Tag(Ref::new("v0.9.0", "c3")),
            ]
        );
    }

    #[test]
    fn test_page_info() {
        let last = PageInfo {
            end_cursor: Some("abc".to_string()),
            has_next_page: false,
        };
        assert_eq!(last.next_cursor(), None);

        let more = PageInfo {
            end_cursor: Some("abc".to_string()),
            has_next_page: true,
        };
        assert_eq!(more.next_cursor().as_deref(), Some("abc"));
    }
}
