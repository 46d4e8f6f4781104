// Domain rules - Policies applied before a file is probed

use crate::domain::settings::Settings;

/// Decides whether an input file is bypassed without probing
#[derive(Debug, Clone)]
pub struct SkipFilter {
    patterns: Vec<String>,
}

impl SkipFilter {
    /// Create a filter from a list of substrings
    pub fn new(patterns: Vec<String>) -> Self {
        // An empty pattern would match every file name
        let patterns = patterns.into_iter().filter(|p| !p.is_empty()).collect();
        Self { patterns }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.skip.clone())
    }

    /// Return the first substring contained in the file name, if any
    pub fn matched(&self, file_name: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|pattern| file_name.contains(pattern.as_str()))
            .map(String::as_str)
    }
}
