//! Changelog formatters

mod json;
mod markdown;
mod registry;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use registry::FormatterRegistry;

use relnote_core::error::ChangelogError;

use crate::types::Changelog;

/// Trait for changelog formatters
pub trait ChangelogFormatter: Send + Sync {
    /// Format name as used on the command line
    fn name(&self) -> &'static str;

    /// Format a changelog to string
    fn format(&self, changelog: &Changelog) -> Result<String, ChangelogError>;

    /// Get the file extension for this format
    fn extension(&self) -> &'static str;
}
