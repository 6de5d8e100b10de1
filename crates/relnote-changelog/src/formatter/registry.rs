//! Formatter registry

use std::sync::Arc;

use super::{ChangelogFormatter, JsonFormatter, MarkdownFormatter};

/// Registry of available changelog formatters
pub struct FormatterRegistry {
    formatters: Vec<Arc<dyn ChangelogFormatter>>,
}

impl FormatterRegistry {
    /// Create a new registry with all built-in formatters
    pub fn new() -> Self {
        Self {
            formatters: vec![
                Arc::new(MarkdownFormatter::new()),
                Arc::new(JsonFormatter::new()),
            ],
        }
    }

    /// Get formatter by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn ChangelogFormatter>> {
        self.formatters.iter().find(|f| f.name() == name).cloned()
    }

    /// Names of all registered formatters
    pub fn names(&self) -> Vec<&'static str> {
        self.formatters.iter().map(|f| f.name()).collect()
    }
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_by_name() {
        let registry = FormatterRegistry::new();
        assert_eq!(registry.get("markdown").map(|f| f.extension()), Some("md"));
        assert_eq!(registry.get("json").map(|f| f.extension()), Some("json"));
        assert!(registry.get("html").is_none());
    }

    #[test]
    fn test_names() {
        let registry = FormatterRegistry::new();
        assert_eq!(registry.names(), vec!["markdown", "json"]);
    }
}
