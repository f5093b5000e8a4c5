//! Output formats for a finished comparison.

use serde::{Deserialize, Serialize};

use crate::diff::DiffResult;

/// JSON payload returned to callers: `{"diff": ...}` or `{"error": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareResponse {
    Diff(DiffResult),
    Error(String),
}

impl<E: std::fmt::Display> From<Result<DiffResult, E>> for CompareResponse {
    fn from(result: Result<DiffResult, E>) -> Self {
        match result {
            Ok(diff) => CompareResponse::Diff(diff),
            Err(e) => CompareResponse::Error(e.to_string()),
        }
    }
}

/// What the text report includes
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub show_unchanged: bool,
    pub show_patches: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            show_unchanged: false,
            show_patches: true,
        }
    }
}

/// Render a human-readable report: summary line, path lists, then patches.
pub fn render_text(result: &DiffResult, options: &ReportOptions) -> String {
    let stats = &result.stats;
    let mut out = format!(
        "{} files: {} added, {} removed, {} modified, {} unchanged\n",
        stats.total_files,
        stats.added_count,
        stats.removed_count,
        stats.modified_count,
        stats.unchanged_count
    );

    let mut sections = vec![
        ("Added", '+', &result.added),
        ("Removed", '-', &result.removed),
        ("Modified", '~', &result.modified),
    ];
    if options.show_unchanged {
        sections.push(("Unchanged", ' ', &result.unchanged));
    }

    for (title, marker, paths) in sections {
        if paths.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{}:\n", title));
        for path in paths {
            out.push_str(&format!("  {} {}\n", marker, path));
        }
    }

    if options.show_patches {
        for patch in result.diffs.values() {
            out.push('\n');
            out.push_str(patch);
        }
    }

    out
}
