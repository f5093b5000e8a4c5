//! Classification of two entry lists into added, removed, modified and
//! unchanged paths.
//!
//! Paths are the only correlation key between the two archives. Text files
//! are compared by exact string equality, so a CRLF/LF change alone makes a
//! file modified. Binary files (and text files that failed to decode) are
//! compared by size only: two different binaries of equal size are reported
//! as unchanged.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::entry::{Entry, TextPolicy};
use super::unified::unified_diff;

/// Knobs for comparison and diff rendering
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Lines of context around each change in unified diffs
    pub context_radius: usize,
    /// Label of the left archive on `---` lines
    pub left_label: String,
    /// Label of the right archive on `+++` lines
    pub right_label: String,
    pub policy: TextPolicy,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            context_radius: 3,
            left_label: "ZIP 1".to_string(),
            right_label: "ZIP 2".to_string(),
            policy: TextPolicy::default(),
        }
    }
}

/// Category a path falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
    Unchanged,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffStats {
    pub total_files: usize,
    pub added_count: usize,
    pub removed_count: usize,
    pub modified_count: usize,
    pub unchanged_count: usize,
}

/// Classified comparison of two archives.
///
/// The four path lists are sorted and disjoint, and together cover every
/// path seen in either archive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub modified: Vec<String>,
    pub unchanged: Vec<String>,
    /// Unified diff per modified text path
    pub diffs: BTreeMap<String, String>,
    pub stats: DiffStats,
}

impl DiffResult {
    pub fn status_of(&self, path: &str) -> Option<ChangeKind> {
        fn contains(paths: &[String], path: &str) -> bool {
            paths.binary_search_by(|p| p.as_str().cmp(path)).is_ok()
        }

        if contains(&self.added, path) {
            Some(ChangeKind::Added)
        } else if contains(&self.removed, path) {
            Some(ChangeKind::Removed)
        } else if contains(&self.modified, path) {
            Some(ChangeKind::Modified)
        } else if contains(&self.unchanged, path) {
            Some(ChangeKind::Unchanged)
        } else {
            None
        }
    }

    /// True when nothing was added, removed or modified
    pub fn is_identical(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

/// Compare two entry lists with default options
pub fn compare(left: &[Entry], right: &[Entry]) -> DiffResult {
    compare_with(left, right, &CompareOptions::default())
}

/// Compare two entry lists.
///
/// Duplicate paths within one list resolve to the last occurrence.
pub fn compare_with(left: &[Entry], right: &[Entry], options: &CompareOptions) -> DiffResult {
    let left_by_path = index_by_path(left);
    let right_by_path = index_by_path(right);

    let all_paths: BTreeSet<&str> = left_by_path
        .keys()
        .chain(right_by_path.keys())
        .copied()
        .collect();

    let mut result = DiffResult::default();

    // BTreeSet iteration keeps every list sorted as it is built
    for path in &all_paths {
        let kind = match (left_by_path.get(path), right_by_path.get(path)) {
            (None, Some(_)) => ChangeKind::Added,
            (Some(_), None) => ChangeKind::Removed,
            (Some(l), Some(r)) => classify(path, l, r, options, &mut result.diffs),
            (None, None) => continue,
        };

        let bucket = match kind {
            ChangeKind::Added => &mut result.added,
            ChangeKind::Removed => &mut result.removed,
            ChangeKind::Modified => &mut result.modified,
            ChangeKind::Unchanged => &mut result.unchanged,
        };
        bucket.push(path.to_string());
    }

    result.stats = DiffStats {
        total_files: all_paths.len(),
        added_count: result.added.len(),
        removed_count: result.removed.len(),
        modified_count: result.modified.len(),
        unchanged_count: result.unchanged.len(),
    };

    tracing::debug!(
        total = result.stats.total_files,
        added = result.stats.added_count,
        removed = result.stats.removed_count,
        modified = result.stats.modified_count,
        "compared archives"
    );

    result
}

fn index_by_path(entries: &[Entry]) -> BTreeMap<&str, &Entry> {
    entries.iter().map(|e| (e.path.as_str(), e)).collect()
}

fn classify(
    path: &str,
    left: &Entry,
    right: &Entry,
    options: &CompareOptions,
    diffs: &mut BTreeMap<String, String>,
) -> ChangeKind {
    match (left.is_directory, right.is_directory) {
        (true, true) => ChangeKind::Unchanged,
        (true, false) | (false, true) => {
            // Type change; the directory side diffs as empty content
            if options.policy.is_text_path(path) {
                let old = left.content.as_deref().unwrap_or("");
                let new = right.content.as_deref().unwrap_or("");
                diffs.insert(path.to_string(), unified_diff(path, old, new, options));
            }
            ChangeKind::Modified
        }
        (false, false) => match (&left.content, &right.content) {
            (Some(old), Some(new)) if old == new => ChangeKind::Unchanged,
            (Some(old), Some(new)) => {
                diffs.insert(path.to_string(), unified_diff(path, old, new, options));
                ChangeKind::Modified
            }
            _ if left.size != right.size => ChangeKind::Modified,
            _ => ChangeKind::Unchanged,
        },
    }
}
