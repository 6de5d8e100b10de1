//! relnote github - GitHub GraphQL history source
//!
//! Reads references and commit history, including the pull request each
//! commit was merged through, from the GitHub GraphQL API.

mod client;
mod history;
mod pulls;
mod refs;
mod schema;

pub use client::{GitHubClient, PAGE_SIZE};
