//! relnote git - local history and commit range resolution
//!
//! This crate reads commit history and references from a local git
//! repository, and decides which slice of history belongs to a release.

mod commits;
mod range;
mod refs;
mod remote;
mod repository;
mod source;

pub use commits::pull_request_number;
pub use range::{parse_version, previous_release_branch, CommitRange, HeadSource, RangeResolver};
pub use remote::browse_url;
pub use repository::{GitRepo, Result};
pub use source::LocalSource;
