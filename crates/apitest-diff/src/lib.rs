//! Structural JSON comparison for API contract tests
//!
//! Compares an expected JSON document against an observed one and produces
//! a verdict plus a textual report. Objects are compared key by key over the
//! union of both key sets, in lexicographic order, so the same inputs always
//! produce byte-identical reports. Everything else (arrays, scalars, mixed
//! types) is compared by exact value equality.
//!
//! Two sets of dotted paths steer the comparison:
//!
//! - `ignore` - the path and its whole subtree are skipped: no report line
//!   and no failure
//! - `watch` - the path is always shown in the report, even when unchanged
//!
//! A path present in both sets is ignored.
//!
//! # Example
//!
//! ```
//! use apitest_diff::{compare, PathRules, ReportStyle};
//! use serde_json::json;
//!
//! let expected = json!({"a": 1, "b": 2});
//! let actual = json!({"a": 1, "b": 3});
//!
//! let diff = compare(&expected, &actual, "", &PathRules::new());
//! assert!(diff.differs());
//! assert_eq!(diff.report(ReportStyle::Compact), "-\"b\":2\n+\"b\":3\n");
//!
//! let rules = PathRules::new().ignore("b");
//! assert!(!compare(&expected, &actual, "", &rules).differs());
//! ```

mod engine;
mod render;
mod rules;

pub use engine::{compare, Change, Diff, Entry};
pub use render::ReportStyle;
pub use rules::{join_path, PathRules};

use serde_json::Value;

/// Compare two documents and render the report in one step
///
/// Returns the verdict together with the rendered report, which is empty
/// when nothing differs and no watched path is present.
pub fn compare_report(
    expected: &Value,
    actual: &Value,
    base_path: &str,
    rules: &PathRules,
    style: ReportStyle,
) -> (bool, String) {
    let diff = compare(expected, actual, base_path, rules);
    (diff.differs(), diff.report(style))
}
