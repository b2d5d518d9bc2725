//! File-type filter matched against the end of a file name.

use std::path::Path;

/// Set of lowercase name suffixes such as `.jpg` or `.tar.gz`.
///
/// Matching is case-insensitive. An empty filter accepts everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    suffixes: Vec<String>,
}

impl ExtensionFilter {
    /// Parse a comma-separated list like `".jpg, .PNG,.pdf"`.
    ///
    /// Entries that are blank or do not start with `.` are dropped. Use
    /// [`ExtensionFilter::parse_with_rejects`] to learn what was dropped.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        Self::parse_with_rejects(input).0
    }

    /// Parse a comma-separated list, returning the rejected entries too.
    #[must_use]
    pub fn parse_with_rejects(input: &str) -> (Self, Vec<String>) {
        let mut filter = Self::default();
        let mut rejected = Vec::new();

        for raw in input.split(',') {
            let entry = raw.trim();
            if entry.is_empty() {
                continue;
            }
            if entry.len() > 1 && entry.starts_with('.') {
                filter.push(entry);
            } else {
                rejected.push(entry.to_string());
            }
        }

        (filter, rejected)
    }

    /// Build a filter from several comma-separated lists (e.g. repeated `--ext` flags).
    #[must_use]
    pub fn from_lists<S: AsRef<str>>(lists: &[S]) -> (Self, Vec<String>) {
        let mut filter = Self::default();
        let mut rejected = Vec::new();
        for list in lists {
            let (parsed, bad) = Self::parse_with_rejects(list.as_ref());
            for suffix in parsed.suffixes {
                filter.push(&suffix);
            }
            rejected.extend(bad);
        }
        (filter, rejected)
    }

    fn push(&mut self, suffix: &str) {
        let suffix = suffix.to_lowercase();
        if !self.suffixes.contains(&suffix) {
            self.suffixes.push(suffix);
        }
    }

    /// True when no suffix is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }

    /// Configured suffixes, lowercased, in first-seen order.
    #[must_use]
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Check whether the file name of `path` passes the filter.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        if self.suffixes.is_empty() {
            return true;
        }
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.to_string_lossy().to_lowercase();
        self.suffixes.iter().any(|s| name.ends_with(s.as_str()))
    }
}

impl std::fmt::Display for ExtensionFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.suffixes.is_empty() {
            write!(f, "all files")
        } else {
            write!(f, "{}", self.suffixes.join(", "))
        }
    }
}
