//! Local repository as a history source

use std::sync::{Mutex, MutexGuard};

use tracing::{info, instrument};

use relnote_core::{Commit, HistorySource, RelnoteError, RepositoryRefs, Result, Stopper};

use crate::remote::browse_url;
use crate::repository::GitRepo;

/// History source reading a local clone.
///
/// Pull requests are derived from commit messages, so they carry no labels.
pub struct LocalSource {
    repo: Mutex<GitRepo>,
    remote: String,
    repository_url: String,
}

impl LocalSource {
    /// Create a source; branches are read from `remote` as well as locally
    pub fn new(repo: GitRepo, remote: impl Into<String>) -> Result<Self> {
        let remote = remote.into();
        let repository_url = repo
            .remote_url(&remote)?
            .map(|url| browse_url(&url))
            .unwrap_or_default();

        info!(remote = %remote, url = %repository_url, "using local repository");

        Ok(Self {
            repo: Mutex::new(repo),
            remote,
            repository_url,
        })
    }

    /// Override the repository URL used for links
    pub fn with_repository_url(mut self, url: impl Into<String>) -> Self {
        self.repository_url = url.into();
        self
    }

    fn repo(&self) -> Result<MutexGuard<'_, GitRepo>> {
        self.repo
            .lock()
            .map_err(|_| RelnoteError::other("git repository lock poisoned"))
    }
}

#[async_trait::async_trait]
impl HistorySource for LocalSource {
    fn name(&self) -> &str {
        "local"
    }

    fn repository_url(&self) -> String {
        self.repository_url.clone()
    }

    #[instrument(skip(self))]
    async fn references(&self) -> Result<RepositoryRefs> {
        Ok(self.repo()?.references(&self.remote)?)
    }

    #[instrument(skip(self))]
    async fn log(&self, head: &str, max_count: usize) -> Result<Vec<Commit>> {
        Ok(self.repo()?.log(head, max_count)?)
    }

    #[instrument(skip(self, stopper))]
    async fn history(&self, head: &str, stopper: &Stopper) -> Result<Vec<Commit>> {
        Ok(self.repo()?.history(head, stopper)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Repository, Signature};
    use tempfile::TempDir;

    fn setup() -> (TempDir, LocalSource) {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        repo.remote("origin", "git@github.com:example/app.git").unwrap();

        let sig = Signature::now("Test", "test@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let first = repo
            .commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
            .unwrap();
        let parent = repo.find_commit(first).unwrap();
        repo.commit(
            Some("HEAD"),
            &sig,
            &sig,
            "Add the thing (#3)\n\n```release-note\nAdd the thing\n```",
            &tree,
            &[&parent],
        )
        .unwrap();

        let source = LocalSource::new(GitRepo::open(temp.path()).unwrap(), "origin").unwrap();
        (temp, source)
    }

    #[test]
    fn test_repository_url_from_remote() {
        let (_temp, source) = setup();
        assert_eq!(source.name(), "local");
        assert_eq!(source.repository_url(), "https://github.com/example/app");

        let source = source.with_repository_url("https://git.example.com/app");
        assert_eq!(source.repository_url(), "https://git.example.com/app");
    }

    #[tokio::test]
    async fn test_history_through_trait() {
        let (_temp, source) = setup();
        let source: &dyn HistorySource = &source;

        let refs = source.references().await.unwrap();
        let head = refs.branch(&refs.default_branch).unwrap().hash.clone();

        let history = source.history(&head, &Stopper::Never).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].pull_request.number, 3);

        let log = source.log(&head, 10).await.unwrap();
        assert_eq!(log.len(), 2);
    }
}
