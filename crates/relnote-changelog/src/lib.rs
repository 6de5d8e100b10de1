//! relnote changelog - release-note extraction and changelog generation
//!
//! This crate reads release-note blocks out of pull request descriptions,
//! classifies them, groups them into a [`Changelog`] and renders it.

pub mod classifier;
pub mod formatter;
pub mod generator;
pub mod parser;
pub mod types;

pub use formatter::{ChangelogFormatter, FormatterRegistry, JsonFormatter, MarkdownFormatter};
pub use generator::{generate_changes, group_changes, ChangelogGenerator};
pub use parser::{note_status, NoteStatus};
pub use types::{Change, ChangeGroup, ChangeType, Changelog};
