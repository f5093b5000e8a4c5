use similar::TextDiff;

use super::compare::CompareOptions;

const SEPARATOR: &str = "===================================================================";

/// Render a unified diff between two versions of `path`.
///
/// The path names both sides; the archive labels from `options` follow it
/// on the `---`/`+++` lines. Identical inputs produce the header only.
pub fn unified_diff(path: &str, old: &str, new: &str, options: &CompareOptions) -> String {
    let diff = TextDiff::from_lines(old, new);

    let mut out = String::new();
    out.push_str(&format!("Index: {}\n{}\n", path, SEPARATOR));
    out.push_str(&format!("--- {}\t{}\n", path, options.left_label));
    out.push_str(&format!("+++ {}\t{}\n", path, options.right_label));

    for hunk in diff
        .unified_diff()
        .context_radius(options.context_radius)
        .iter_hunks()
    {
        out.push_str(&hunk.to_string());
    }

    out
}
