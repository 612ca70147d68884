//! Path rules controlling which keys are suppressed or surfaced

use std::collections::HashSet;

/// Dotted paths to ignore or watch while comparing
///
/// Membership is exact string equality on the full dotted path (`a.b.c`).
/// There is no globbing and arrays are never indexed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathRules {
    /// Paths whose subtree is skipped entirely
    ignore: HashSet<String>,
    /// Paths that are always shown in the report
    watch: HashSet<String>,
}

impl PathRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build rules from the `ignore` and `watch` lists of a test case
    pub fn from_lists<I, W>(ignore: I, watch: W) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        W: IntoIterator,
        W::Item: Into<String>,
    {
        Self {
            ignore: ignore.into_iter().map(Into::into).collect(),
            watch: watch.into_iter().map(Into::into).collect(),
        }
    }

    pub fn ignore(mut self, path: impl Into<String>) -> Self {
        self.ignore.insert(path.into());
        self
    }

    pub fn watch(mut self, path: impl Into<String>) -> Self {
        self.watch.insert(path.into());
        self
    }

    pub fn is_ignored(&self, path: &str) -> bool {
        self.ignore.contains(path)
    }

    /// Whether a path should be surfaced; an ignored path never is
    pub fn is_watched(&self, path: &str) -> bool {
        !self.is_ignored(path) && self.watch.contains(path)
    }
}

/// Append a key to a dotted base path
pub fn join_path(base: &str, key: &str) -> String {
    if base.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", base, key)
    }
}
