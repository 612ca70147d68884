//! Recursive comparison of two JSON trees

use crate::rules::{join_path, PathRules};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::trace;

/// Outcome of comparing an expected document against an actual one
///
/// Borrows both trees; nothing is cloned while comparing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diff<'a> {
    entries: Vec<Entry<'a>>,
    differs: bool,
}

/// A single compared location
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<'a> {
    /// Object key, `None` for a root-level value comparison
    pub key: Option<&'a str>,
    /// Full dotted path of this location
    pub path: String,
    /// Whether the path is listed in the watch set
    pub watched: bool,
    pub change: Change<'a>,
}

/// What happened to a compared location
#[derive(Debug, Clone, PartialEq)]
pub enum Change<'a> {
    /// Present on both sides with equal values
    Unchanged(&'a Value),
    /// Only present in the actual document
    Added(&'a Value),
    /// Only present in the expected document
    Removed(&'a Value),
    /// Present on both sides with different values
    Modified {
        expected: &'a Value,
        actual: &'a Value,
    },
    /// Both sides are objects; compared recursively
    Object { actual: &'a Value, diff: Diff<'a> },
}

/// Compare `expected` against `actual`
///
/// `base_path` is the dotted path of the compared trees inside a larger
/// document (empty for a whole document). Keys whose full path is in the
/// ignore set are skipped together with their subtree.
pub fn compare<'a>(
    expected: &'a Value,
    actual: &'a Value,
    base_path: &str,
    rules: &PathRules,
) -> Diff<'a> {
    match (expected, actual) {
        (Value::Object(expected), Value::Object(actual)) => {
            compare_objects(expected, actual, base_path, rules)
        }
        _ if expected == actual => Diff::default(),
        _ => Diff {
            entries: vec![Entry {
                key: None,
                path: base_path.to_string(),
                watched: rules.is_watched(base_path),
                change: Change::Modified { expected, actual },
            }],
            differs: true,
        },
    }
}

fn compare_objects<'a>(
    expected: &'a Map<String, Value>,
    actual: &'a Map<String, Value>,
    base_path: &str,
    rules: &PathRules,
) -> Diff<'a> {
    let keys: BTreeSet<&'a str> = expected
        .keys()
        .chain(actual.keys())
        .map(String::as_str)
        .collect();

    let mut diff = Diff::default();

    for key in keys {
        let path = join_path(base_path, key);
        if rules.is_ignored(&path) {
            trace!("Skipping ignored path {}", path);
            continue;
        }

        let change = match (expected.get(key), actual.get(key)) {
            (Some(e), None) => Change::Removed(e),
            (None, Some(a)) => Change::Added(a),
            (Some(e @ Value::Object(_)), Some(a @ Value::Object(_))) => Change::Object {
                actual: a,
                diff: compare(e, a, &path, rules),
            },
            (Some(e), Some(a)) if e == a => Change::Unchanged(a),
            (Some(e), Some(a)) => Change::Modified {
                expected: e,
                actual: a,
            },
            (None, None) => continue,
        };

        diff.differs |= change.differs();
        diff.entries.push(Entry {
            key: Some(key),
            watched: rules.is_watched(&path),
            path,
            change,
        });
    }

    diff
}

impl<'a> Diff<'a> {
    /// Whether at least one unsuppressed difference was found
    pub fn differs(&self) -> bool {
        self.differs
    }

    /// Compared locations in lexicographic key order
    pub fn entries(&self) -> &[Entry<'a>] {
        &self.entries
    }

    /// Whether any watched path is present at or below this level
    pub fn has_watched(&self) -> bool {
        self.entries.iter().any(Entry::is_surfaced)
    }

    /// Number of differing leaf locations (added, removed or modified)
    pub fn change_count(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| match &entry.change {
                Change::Unchanged(_) => 0,
                Change::Object { diff, .. } => diff.change_count(),
                _ => 1,
            })
            .sum()
    }

    /// Whether this diff compares two scalar or array values directly
    pub(crate) fn is_root_value(&self) -> bool {
        self.entries.iter().any(|entry| entry.key.is_none())
    }
}

impl Entry<'_> {
    /// Whether this entry, or anything beneath it, is watched
    pub fn is_surfaced(&self) -> bool {
        self.watched
            || matches!(&self.change, Change::Object { diff, .. } if diff.has_watched())
    }
}

impl Change<'_> {
    pub fn differs(&self) -> bool {
        match self {
            Change::Unchanged(_) => false,
            Change::Object { diff, .. } => diff.differs(),
            _ => true,
        }
    }
}
