//! Commit range resolution
//!
//! Given the version a changelog is generated for, decide which commit the
//! changelog starts at (the head) and where walking history stops.
//!
//! The head is the tag for the version if it exists, else the head of the
//! version's release branch (not tagged yet), else the default branch (no
//! release branch opened yet).
//!
//! Unless an explicit end commit is given, the walk stops when it reaches
//! either
//!
//! - a commit of the previous release branch, which is where the two release
//!   lines meet, or
//! - any other stable (non-prerelease) tag, so that the notes for `1.2.3`
//!   cover everything since `1.2.2` and not only since `1.2.3-rc.1`.

use std::collections::HashSet;
use std::fmt;

use semver::Version;
use tracing::{info, instrument, warn};

use relnote_core::config::RangeConfig;
use relnote_core::error::RangeError;
use relnote_core::{HistorySource, Ref, RepositoryRefs, Result, Stopper};

/// Which reference the head commit was taken from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadSource {
    /// Tag named after the version
    Tag(String),
    /// Release branch of the version's minor line
    ReleaseBranch(String),
    /// Default branch
    DefaultBranch(String),
}

impl HeadSource {
    /// Name of the reference
    pub fn name(&self) -> &str {
        match self {
            Self::Tag(name) | Self::ReleaseBranch(name) | Self::DefaultBranch(name) => name,
        }
    }

    /// Kind of the reference
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Tag(_) => "tag",
            Self::ReleaseBranch(_) => "release-branch",
            Self::DefaultBranch(_) => "default-branch",
        }
    }
}

impl fmt::Display for HeadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.name())
    }
}

/// Resolved range of history for a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRange {
    /// Hash of the newest commit
    pub head: String,
    /// Where the head came from
    pub head_source: HeadSource,
    /// Where walking history stops
    pub stopper: Stopper,
}

/// Resolves commit ranges against a history source
pub struct RangeResolver<'a> {
    source: &'a dyn HistorySource,
    config: &'a RangeConfig,
}

impl<'a> RangeResolver<'a> {
    /// Create a resolver. `source` is only used to load the previous release
    /// branch's log.
    pub fn new(source: &'a dyn HistorySource, config: &'a RangeConfig) -> Self {
        Self { source, config }
    }

    /// Resolve the range for `version`.
    ///
    /// `end` is a commit hash prefix; when given, the walk stops there and
    /// the previous release is not looked at.
    #[instrument(skip(self, refs))]
    pub async fn resolve(
        &self,
        version: &str,
        end: Option<&str>,
        refs: &RepositoryRefs,
    ) -> Result<CommitRange> {
        let target = parse_version(version)?;
        let (head, head_source) = self.resolve_head(version, &target, refs)?;

        if let Some(end) = end.filter(|e| !e.is_empty()) {
            info!(end, "stopping at explicit end commit");
            return Ok(CommitRange {
                head,
                head_source,
                stopper: Stopper::CommitPrefix(end.to_string()),
            });
        }

        let prefix = &self.config.release_branch_prefix;
        let previous_branch = previous_release_branch(&target, refs, prefix)?;
        info!(previous = %previous_branch.name, "detected previous release branch");

        info!(
            depth = self.config.previous_release_depth,
            "fetching previous release commits"
        );
        let previous_release: HashSet<String> = self
            .source
            .log(&previous_branch.hash, self.config.previous_release_depth)
            .await?
            .into_iter()
            .map(|c| c.hash)
            .collect();

        let stable_tags = stable_tag_hashes(&refs.tags, &target);

        Ok(CommitRange {
            head,
            head_source,
            stopper: Stopper::Boundary {
                previous_release,
                stable_tags,
            },
        })
    }

    fn resolve_head(
        &self,
        version: &str,
        target: &Version,
        refs: &RepositoryRefs,
    ) -> std::result::Result<(String, HeadSource), RangeError> {
        let bare = version.strip_prefix('v').unwrap_or(version);
        let prefixed = format!("v{}", bare);

        if let Some(tag) = refs
            .tags
            .iter()
            .find(|t| t.name == bare || t.name == prefixed)
        {
            info!(tag = %tag.name, commit = %tag.hash, "resolved version to an existing tag");
            return Ok((tag.hash.clone(), HeadSource::Tag(tag.name.clone())));
        }

        let prefix = &self.config.release_branch_prefix;
        if let Some(branch) = find_release_branch(refs, prefix, target.major, target.minor) {
            warn!(
                branch = %branch.name,
                "version is not tagged yet, using the head of its release branch"
            );
            return Ok((
                branch.hash.clone(),
                HeadSource::ReleaseBranch(branch.name.clone()),
            ));
        }

        warn!(
            primary = %refs.default_branch,
            "no release branch exists for this version, falling back to the default branch"
        );
        refs.branch(&refs.default_branch)
            .map(|b| (b.hash.clone(), HeadSource::DefaultBranch(b.name.clone())))
            .ok_or_else(|| RangeError::UnresolvableHead {
                branch: refs.default_branch.clone(),
            })
    }
}

/// Parse a version, tolerating a leading `v`
pub fn parse_version(version: &str) -> std::result::Result<Version, RangeError> {
    let bare = version.strip_prefix('v').unwrap_or(version);
    Version::parse(bare).map_err(|e| RangeError::InvalidVersion {
        version: version.to_string(),
        reason: e.to_string(),
    })
}

/// Find the release branch of the minor line preceding `version`.
///
/// Goes back one minor; for `x.0` it picks the highest minor that has a
/// release branch in major `x - 1`.
pub fn previous_release_branch<'r>(
    version: &Version,
    refs: &'r RepositoryRefs,
    prefix: &str,
) -> std::result::Result<&'r Ref, RangeError> {
    let (major, minor) = match version.minor.checked_sub(1) {
        Some(minor) => (version.major, minor),
        None => {
            let major = version
                .major
                .checked_sub(1)
                .ok_or(RangeError::NoPreviousRelease { major: 0 })?;

            let minor = refs
                .branches
                .iter()
                .filter_map(|b| release_branch_version(&b.name, prefix))
                .filter(|(branch_major, _)| *branch_major == major)
                .map(|(_, minor)| minor)
                .max()
                .ok_or(RangeError::NoPreviousRelease { major })?;

            (major, minor)
        }
    };

    find_release_branch(refs, prefix, major, minor).ok_or_else(|| RangeError::MissingBranchHead {
        branch: format!("{}{}.{}", prefix, major, minor),
    })
}

fn find_release_branch<'r>(
    refs: &'r RepositoryRefs,
    prefix: &str,
    major: u64,
    minor: u64,
) -> Option<&'r Ref> {
    refs.branches
        .iter()
        .find(|b| release_branch_version(&b.name, prefix) == Some((major, minor)))
}

/// Major and minor of a release branch name (`<prefix>[v]<major>.<minor>`)
fn release_branch_version(name: &str, prefix: &str) -> Option<(u64, u64)> {
    let rest = name.strip_prefix(prefix)?;
    let rest = rest.strip_prefix('v').unwrap_or(rest);
    let (major, minor) = rest.split_once('.')?;

    let is_number = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_number(major) || !is_number(minor) {
        return None;
    }

    Some((major.parse().ok()?, minor.parse().ok()?))
}

/// Hashes of all stable tags other than the target version.
///
/// Prereleases never stop the walk, and neither does the target itself
/// (the walk would end at its first commit).
fn stable_tag_hashes(tags: &[Ref], target: &Version) -> HashSet<String> {
    tags.iter()
        .filter(|tag| match parse_version(&tag.name) {
            Ok(version) => version.pre.is_empty() && version != *target,
            Err(_) => false,
        })
        .map(|tag| tag.hash.clone())
        .collect()
}
