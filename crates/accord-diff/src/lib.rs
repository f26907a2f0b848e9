//! # Accord Diff - position-aligned line diff
//!
//! **Purpose**: Compute the line-level delta between two document revisions
//! and a human-readable summary.
//!
//! This is a position-aligned diff, not a longest-common-subsequence diff:
//! line `i` of the old text is compared against line `i` of the new text,
//! and every changed line yields a remove+add pair. Block moves are not
//! detected. That is a deliberate simplicity/cost tradeoff carried by the
//! stored diff format; changing the algorithm would change every persisted
//! audit artifact, so it is fixed.
//!
//! The function is total: any pair of strings (including empty) produces a
//! diff, and no I/O happens here.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use serde::{Deserialize, Serialize};

/// Whether a diff entry adds or removes a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    /// Line present in the new text but not the old at this position
    Add,
    /// Line present in the old text but not the new at this position
    Remove,
}

/// One added or removed line, with its 1-based position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    /// Add or remove
    #[serde(rename = "type")]
    pub kind: DiffKind,
    /// The line text
    pub line: String,
    /// 1-based line number at the time of emission
    pub line_num: usize,
}

/// A computed diff: ordered entries plus addition/deletion counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDiff {
    /// Ordered entries; a changed line emits its remove before its add
    pub entries: Vec<DiffEntry>,
    /// Number of add entries
    pub additions: usize,
    /// Number of remove entries
    pub deletions: usize,
}

impl LineDiff {
    /// Human-readable one-line summary, e.g. `"2 additions, 1 deletions"`
    pub fn summary(&self) -> String {
        format!("{} additions, {} deletions", self.additions, self.deletions)
    }

    /// True when the two inputs were line-for-line identical
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compute the position-aligned line diff from `old_text` to `new_text`.
///
/// Walks indices `0..max(old_lines, new_lines)`; positions past the end of
/// one side emit a bare add or remove, differing lines emit a remove+add
/// pair, equal lines emit nothing. Note that splitting on `'\n'` yields one
/// empty line for the empty string, matching the stored diff format for
/// first-revision diffs against empty content.
pub fn compute_diff(old_text: &str, new_text: &str) -> LineDiff {
    let old_lines: Vec<&str> = old_text.split('\n').collect();
    let new_lines: Vec<&str> = new_text.split('\n').collect();

    let mut entries = Vec::new();
    let mut additions = 0;
    let mut deletions = 0;

    for i in 0..old_lines.len().max(new_lines.len()) {
        if i >= old_lines.len() {
            entries.push(DiffEntry {
                kind: DiffKind::Add,
                line: new_lines[i].to_string(),
                line_num: i + 1,
            });
            additions += 1;
        } else if i >= new_lines.len() {
            entries.push(DiffEntry {
                kind: DiffKind::Remove,
                line: old_lines[i].to_string(),
                line_num: i + 1,
            });
            deletions += 1;
        } else if old_lines[i] != new_lines[i] {
            entries.push(DiffEntry {
                kind: DiffKind::Remove,
                line: old_lines[i].to_string(),
                line_num: i + 1,
            });
            entries.push(DiffEntry {
                kind: DiffKind::Add,
                line: new_lines[i].to_string(),
                line_num: i + 1,
            });
            deletions += 1;
            additions += 1;
        }
    }

    LineDiff {
        entries,
        additions,
        deletions,
    }
}

/// Reconstruct the new text by applying a diff to the old text.
///
/// Inverse of [`compute_diff`] for the position-aligned format: at each
/// position an add entry supplies the new line, a bare remove drops a
/// trailing old line, and untouched positions carry the old line through.
pub fn apply_diff(old_text: &str, diff: &LineDiff) -> String {
    use std::collections::HashMap;

    let old_lines: Vec<&str> = old_text.split('\n').collect();
    let mut adds: HashMap<usize, &str> = HashMap::new();
    let mut removes: HashMap<usize, bool> = HashMap::new();
    for entry in &diff.entries {
        match entry.kind {
            DiffKind::Add => {
                adds.insert(entry.line_num, entry.line.as_str());
            }
            DiffKind::Remove => {
                removes.insert(entry.line_num, true);
            }
        }
    }

    let top = old_lines
        .len()
        .max(diff.entries.iter().map(|e| e.line_num).max().unwrap_or(0));

    let mut result: Vec<&str> = Vec::with_capacity(top);
    for i in 1..=top {
        if let Some(line) = adds.get(&i) {
            result.push(line);
        } else if removes.contains_key(&i) {
            // trailing removal: the new text ends before this position
            continue;
        } else if i <= old_lines.len() {
            result.push(old_lines[i - 1]);
        }
    }
    result.join("\n")
}
