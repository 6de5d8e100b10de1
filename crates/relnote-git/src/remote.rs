//! Remote operations

use relnote_core::error::GitError;

use crate::repository::{GitRepo, Result};

impl GitRepo {
    /// Get the URL for a remote, `None` if the remote does not exist
    pub fn remote_url(&self, name: &str) -> Result<Option<String>> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(|s| s.to_string())),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::Git2(e)),
        }
    }
}

/// Turn a clone URL into the repository's web URL.
///
/// Handles `git@host:owner/repo.git`, `ssh://git@host/owner/repo.git` and
/// `https://host/owner/repo.git`.
pub fn browse_url(remote_url: &str) -> String {
    let url = remote_url.trim().trim_end_matches('/');
    let url = url.strip_suffix(".git").unwrap_or(url);

    if let Some(rest) = url.strip_prefix("ssh://") {
        let rest = rest.split_once('@').map_or(rest, |(_, host)| host);
        return format!("https://{}", rest);
    }

    if let Some((user_host, path)) = url.split_once(':') {
        if !user_host.contains('/') && !path.starts_with("//") {
            let host = user_host.split_once('@').map_or(user_host, |(_, host)| host);
            return format!("https://{}/{}", host, path);
        }
    }

    if let Some(rest) = url.strip_prefix("http://") {
        return format!("https://{}", rest);
    }

    url.to_string()
}
