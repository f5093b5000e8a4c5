use serde::{Deserialize, Serialize};

/// Extensions whose contents are decoded and diffed as text
pub const TEXT_FILE_EXTENSIONS: &[&str] = &[
    ".txt", ".md", ".json", ".html", ".js", ".ts", ".css", ".tsx", ".jsx", ".py", ".java", ".cpp",
    ".c", ".h", ".php", ".rb", ".go", ".rs", ".swift", ".kt", ".scala", ".sh", ".bat", ".ps1",
    ".yml", ".yaml", ".xml", ".sql", ".dockerfile", ".gitignore", ".env", ".config", ".ini",
    ".toml", ".lock",
];

/// One file or directory found in an archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Normalized, forward-slash separated path
    pub path: String,
    pub is_directory: bool,
    /// Decoded text, only for text files that decoded cleanly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Uncompressed size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl Entry {
    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_directory: true,
            content: None,
            size: Some(0),
        }
    }

    pub fn text(path: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            path: path.into(),
            is_directory: false,
            size: Some(content.len() as u64),
            content: Some(content),
        }
    }

    pub fn binary(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            is_directory: false,
            content: None,
            size: Some(size),
        }
    }
}

/// Decides which paths are treated as text.
#[derive(Debug, Clone)]
pub struct TextPolicy {
    extensions: Vec<String>,
}

impl Default for TextPolicy {
    fn default() -> Self {
        Self {
            extensions: TEXT_FILE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl TextPolicy {
    /// Add an extension (with or without the leading dot) to the allow-list
    pub fn with_extension(mut self, extension: &str) -> Self {
        let extension = extension.trim().to_lowercase();
        let extension = if extension.starts_with('.') {
            extension
        } else {
            format!(".{}", extension)
        };
        if !self.extensions.contains(&extension) {
            self.extensions.push(extension);
        }
        self
    }

    /// True when the path ends with an allow-listed extension, or when its
    /// final segment has no extension at all (`Makefile`, `LICENSE`).
    pub fn is_text_path(&self, path: &str) -> bool {
        let lower = path.to_lowercase();
        if self.extensions.iter().any(|ext| lower.ends_with(ext.as_str())) {
            return true;
        }

        let file_name = lower.rsplit('/').next().unwrap_or(&lower);
        !file_name.contains('.')
    }
}

/// [`TextPolicy::is_text_path`] with the default allow-list
pub fn is_text_path(path: &str) -> bool {
    TextPolicy::default().is_text_path(path)
}

/// Normalize a stored archive path.
///
/// Backslashes become slashes and the path is split into segments.
/// Empty and whitespace-only segments are dropped, so slash runs collapse
/// and no leading or trailing slash survives, even one hidden behind
/// whitespace. Whitespace around the whole path is trimmed. An empty
/// result means the record named the archive root.
pub fn normalize_path(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let mut out = String::with_capacity(unified.len());
    for segment in unified.split('/').filter(|s| !s.trim().is_empty()) {
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(segment);
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_separators() {
        assert_eq!(normalize_path("src\\lib.rs"), "src/lib.rs");
        assert_eq!(normalize_path("a//b///c"), "a/b/c");
        assert_eq!(normalize_path("/root/dir/"), "root/dir");
        assert_eq!(normalize_path("  notes.txt "), "notes.txt");
        assert_eq!(normalize_path("docs\\\\guide\\"), "docs/guide");
    }

    #[test]
    fn slashes_behind_whitespace_are_stripped() {
        assert_eq!(normalize_path(" /a"), "a");
        assert_eq!(normalize_path("/ /a"), "a");
        assert_eq!(normalize_path("a/ /b/ "), "a/b");
        assert_eq!(normalize_path("my docs/ read me.txt"), "my docs/ read me.txt");
    }

    #[test]
    fn root_entries_normalize_to_empty() {
        assert_eq!(normalize_path("/"), "");
        assert_eq!(normalize_path("\\\\"), "");
        assert_eq!(normalize_path(" / "), "");
        assert_eq!(normalize_path(""), "");
    }

    #[test]
    fn text_detection() {
        assert!(is_text_path("src/main.rs"));
        assert!(is_text_path("README.MD"));
        assert!(is_text_path("Makefile"));
        assert!(is_text_path("config/.gitignore"));
        assert!(is_text_path("v1.2/LICENSE"));
        assert!(!is_text_path("assets/logo.png"));
        assert!(!is_text_path("lib/app.jar"));
    }

    #[test]
    fn policy_accepts_extra_extensions() {
        let policy = TextPolicy::default().with_extension("csv");
        assert!(policy.is_text_path("data/report.csv"));
        assert!(!TextPolicy::default().is_text_path("data/report.csv"));
    }

    #[test]
    fn entry_serializes_camel_case() {
        let json = serde_json::to_value(Entry::directory("assets")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "path": "assets", "isDirectory": true, "size": 0 })
        );
    }
}
