//! Tag and branch listing

use std::collections::HashSet;

use git2::BranchType;
use tracing::{debug, instrument, warn};

use relnote_core::{Ref, RepositoryRefs};

use crate::repository::{GitRepo, Result};

impl GitRepo {
    /// List the default branch, all tags and all branches.
    ///
    /// Branches are the local branches plus the tracking branches of `remote`
    /// (without the `<remote>/` prefix); a local branch shadows a tracking
    /// branch of the same name.
    #[instrument(skip(self))]
    pub fn references(&self, remote: &str) -> Result<RepositoryRefs> {
        let refs = RepositoryRefs {
            default_branch: self.default_branch(remote)?,
            tags: self.tag_refs()?,
            branches: self.branch_refs(remote)?,
        };

        debug!(
            default_branch = %refs.default_branch,
            tags = refs.tags.len(),
            branches = refs.branches.len(),
            "listed references"
        );
        Ok(refs)
    }

    /// All tags, peeled to the commit they point at
    pub fn tag_refs(&self) -> Result<Vec<Ref>> {
        let mut tags = Vec::new();

        self.repo.tag_foreach(|oid, name| {
            let name = String::from_utf8_lossy(name)
                .trim_start_matches("refs/tags/")
                .to_string();

            // annotated tags point at a tag object, not at the commit
            match self
                .repo
                .find_object(oid, None)
                .and_then(|object| object.peel_to_commit())
            {
                Ok(commit) => tags.push(Ref::new(name, commit.id().to_string())),
                Err(e) => warn!(tag = %name, error = %e, "skipping tag not pointing at a commit"),
            }

            true
        })?;

        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    /// Local branches plus the tracking branches of `remote`
    pub fn branch_refs(&self, remote: &str) -> Result<Vec<Ref>> {
        let mut branches = Vec::new();
        let mut seen = HashSet::new();

        for entry in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = entry?;
            let Some(name) = branch.name()?.map(str::to_string) else {
                continue;
            };

            let commit = branch.get().peel_to_commit()?;
            seen.insert(name.clone());
            branches.push(Ref::new(name, commit.id().to_string()));
        }

        let remote_prefix = format!("{}/", remote);
        for entry in self.repo.branches(Some(BranchType::Remote))? {
            let (branch, _) = entry?;
            let Some(name) = branch
                .name()?
                .and_then(|n| n.strip_prefix(&remote_prefix))
                .map(str::to_string)
            else {
                continue;
            };

            if name == "HEAD" || seen.contains(&name) {
                continue;
            }

            let commit = branch.get().peel_to_commit()?;
            seen.insert(name.clone());
            branches.push(Ref::new(name, commit.id().to_string()));
        }

        Ok(branches)
    }

    /// Name of the default branch: the target of `refs/remotes/<remote>/HEAD`,
    /// else the currently checked out branch
    pub fn default_branch(&self, remote: &str) -> Result<String> {
        let remote_head = format!("refs/remotes/{}/HEAD", remote);
        if let Ok(reference) = self.repo.find_reference(&remote_head) {
            let remote_prefix = format!("refs/remotes/{}/", remote);
            if let Some(name) = reference
                .symbolic_target()
                .and_then(|target| target.strip_prefix(&remote_prefix))
            {
                return Ok(name.to_string());
            }
        }

        let head = self.repo.find_reference("HEAD")?;
        match head.symbolic_target() {
            Some(target) => Ok(target.trim_start_matches("refs/heads/").to_string()),
            None => {
                warn!("HEAD is detached, no default branch");
                Ok(String::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Oid, Repository, Signature};
    use tempfile::TempDir;

    fn commit(repo: &Repository, message: &str) -> Oid {
        let sig = Signature::now("Test", "test@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parents: Vec<_> = repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok())
            .into_iter()
            .collect();
        let parents: Vec<_> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    fn setup() -> (TempDir, Repository) {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        repo.set_head("refs/heads/main").unwrap();
        (temp, repo)
    }

    #[test]
    fn test_tags_are_peeled() {
        let (temp, repo) = setup();
        let first = commit(&repo, "first");
        let second = commit(&repo, "second");

        let sig = Signature::now("Test", "test@example.com").unwrap();
        let first_obj = repo.find_object(first, None).unwrap();
        repo.tag_lightweight("v1.0.0", &first_obj, false).unwrap();
        let second_obj = repo.find_object(second, None).unwrap();
        repo.tag("v1.1.0", &second_obj, &sig, "release 1.1.0", false)
            .unwrap();

        let git_repo = GitRepo::open(temp.path()).unwrap();
        let tags = git_repo.tag_refs().unwrap();

        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0], Ref::new("v1.0.0", first.to_string()));
        assert_eq!(tags[1], Ref::new("v1.1.0", second.to_string()));
    }

    #[test]
    fn test_branches_merge_local_and_remote() {
        let (temp, repo) = setup();
        let first = commit(&repo, "first");
        let second = commit(&repo, "second");

        repo.reference("refs/remotes/origin/main", first, false, "")
            .unwrap();
        repo.reference("refs/remotes/origin/release/v1.2", first, false, "")
            .unwrap();
        repo.reference("refs/remotes/upstream/other", first, false, "")
            .unwrap();

        let git_repo = GitRepo::open(temp.path()).unwrap();
        let refs = git_repo.references("origin").unwrap();

        // local main wins over origin/main
        assert_eq!(refs.branch("main").unwrap().hash, second.to_string());
        assert_eq!(refs.branch("release/v1.2").unwrap().hash, first.to_string());
        assert!(refs.branch("other").is_none());
        assert_eq!(refs.branches.len(), 2);
    }

    #[test]
    fn test_default_branch() {
        let (temp, repo) = setup();
        let first = commit(&repo, "first");

        let git_repo = GitRepo::open(temp.path()).unwrap();
        assert_eq!(git_repo.default_branch("origin").unwrap(), "main");

        repo.reference("refs/remotes/origin/develop", first, false, "")
            .unwrap();
        repo.reference_symbolic(
            "refs/remotes/origin/HEAD",
            "refs/remotes/origin/develop",
            false,
            "",
        )
        .unwrap();
        assert_eq!(git_repo.default_branch("origin").unwrap(), "develop");
    }
}
