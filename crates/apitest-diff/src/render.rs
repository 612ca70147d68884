//! Text rendering of a comparison
//!
//! Both styles write into a caller-supplied [`fmt::Write`] sink so that
//! concurrent test cases each render into their own buffer.

use crate::engine::{Change, Diff, Entry};
use serde_json::Value;
use std::fmt::{self, Write};

const INDENT: usize = 2;

/// Presentation of a comparison report
///
/// Both styles describe the same comparison; only the layout differs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportStyle {
    /// Indented object blocks, unchanged siblings echoed for context
    #[default]
    Nested,
    /// One line per differing (or watched) dotted path
    Compact,
}

impl Diff<'_> {
    /// Render the report into `out`
    pub fn render<W: Write>(&self, style: ReportStyle, out: &mut W) -> fmt::Result {
        match style {
            ReportStyle::Nested => render_nested(self, out),
            ReportStyle::Compact => render_compact(self, out),
        }
    }

    /// Render the report into a new string
    pub fn report(&self, style: ReportStyle) -> String {
        let mut out = String::new();
        self.render(style, &mut out).ok();
        out
    }
}

fn render_nested<W: Write>(diff: &Diff<'_>, out: &mut W) -> fmt::Result {
    if !diff.differs() && !diff.has_watched() {
        return Ok(());
    }

    if diff.is_root_value() {
        return write_entries(diff, true, 0, out);
    }

    writeln!(out, "{{")?;
    write_entries(diff, diff.differs(), 1, out)?;
    writeln!(out, "}}")
}

/// Write the entries of one object level
///
/// With `full` every entry is shown; otherwise only watched entries and the
/// blocks leading to them.
fn write_entries<W: Write>(diff: &Diff<'_>, full: bool, depth: usize, out: &mut W) -> fmt::Result {
    let pad = " ".repeat(depth * INDENT);

    for entry in diff.entries() {
        if !full && !entry.is_surfaced() {
            continue;
        }

        let marker = if entry.watched { "* " } else { "" };
        let label = Label(entry);

        match &entry.change {
            Change::Removed(value) => writeln!(out, "{pad}- {label}{value},")?,
            Change::Added(value) => writeln!(out, "{pad}+ {label}{value},")?,
            Change::Modified { expected, actual } => {
                writeln!(out, "{pad}- {label}{expected},")?;
                writeln!(out, "{pad}+ {label}{actual},")?;
            }
            Change::Unchanged(value) => writeln!(out, "{pad}{marker}{label}{value},")?,
            Change::Object { actual, diff: child } => {
                if child.differs() || child.has_watched() {
                    writeln!(out, "{pad}{marker}{label}{{")?;
                    write_entries(child, full || entry.watched, depth + 1, out)?;
                    writeln!(out, "{pad}}},")?;
                } else {
                    writeln!(out, "{pad}{marker}{label}{actual},")?;
                }
            }
        }
    }

    Ok(())
}

fn render_compact<W: Write>(diff: &Diff<'_>, out: &mut W) -> fmt::Result {
    for entry in diff.entries() {
        let path = display_path(entry);

        match &entry.change {
            Change::Removed(value) => writeln!(out, "-\"{path}\":{value}")?,
            Change::Added(value) => writeln!(out, "+\"{path}\":{value}")?,
            Change::Modified { expected, actual } => {
                writeln!(out, "-\"{path}\":{expected}")?;
                writeln!(out, "+\"{path}\":{actual}")?;
            }
            Change::Unchanged(value) => {
                if entry.watched {
                    write_watched(out, path, value)?;
                }
            }
            Change::Object { actual, diff: child } => {
                if entry.watched && !child.differs() {
                    write_watched(out, path, actual)?;
                } else {
                    render_compact(child, out)?;
                }
            }
        }
    }

    Ok(())
}

fn write_watched<W: Write>(out: &mut W, path: &str, value: &Value) -> fmt::Result {
    writeln!(out, "*\"{path}\":{value}")
}

fn display_path<'e>(entry: &'e Entry<'_>) -> &'e str {
    if entry.path.is_empty() {
        "$"
    } else {
        &entry.path
    }
}

/// `"key": ` prefix of a nested line; empty for root-level values
struct Label<'e, 'a>(&'e Entry<'a>);

impl fmt::Display for Label<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.key {
            Some(key) => write!(f, "{}: ", Value::from(key)),
            None => Ok(()),
        }
    }
}
