//! relnote core - shared types, configuration and errors
//!
//! This crate provides the commit and reference model shared by the history
//! sources, the history source trait itself, configuration loading, and the
//! error types used across the workspace.

pub mod config;
pub mod error;
pub mod history;
pub mod types;

pub use error::{RelnoteError, Result};
pub use history::HistorySource;
pub use types::{Commit, PullRequest, Ref, RepositoryRefs, Stopper};
