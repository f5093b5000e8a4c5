//! Entry extraction: archive bytes in, path-sorted [`Entry`] list out.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::ArchiveFormatError;
use crate::io::{MemoryReader, ReadAt};
use crate::zip::{ZipExtractor, ZipFileEntry};

use super::entry::{Entry, TextPolicy, normalize_path};

/// Builds the entry list of one archive.
///
/// Only a malformed container fails the extraction. A text entry that
/// cannot be read, inflated or decoded as UTF-8 is logged and kept
/// without content, so it is compared like a binary file.
pub struct EntryExtractor<R: ReadAt> {
    archive: ZipExtractor<R>,
    policy: TextPolicy,
}

impl<R: ReadAt> EntryExtractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self::with_policy(reader, TextPolicy::default())
    }

    pub fn with_policy(reader: Arc<R>, policy: TextPolicy) -> Self {
        Self {
            archive: ZipExtractor::new(reader),
            policy,
        }
    }

    /// Extract every entry, sorted by path.
    ///
    /// Records that normalize to the same path overwrite each other;
    /// the last one in Central Directory order wins.
    pub async fn extract(&self) -> Result<Vec<Entry>, ArchiveFormatError> {
        let records = self.archive.list_files().await?;
        tracing::debug!(records = records.len(), "read central directory");

        let mut by_path = BTreeMap::new();
        for record in &records {
            let path = normalize_path(&record.file_name);
            if path.is_empty() {
                continue;
            }

            let entry = self.build_entry(path, record).await;
            if let Some(previous) = by_path.insert(entry.path.clone(), entry) {
                tracing::debug!(path = %previous.path, "duplicate path, keeping the last record");
            }
        }

        Ok(by_path.into_values().collect())
    }

    async fn build_entry(&self, path: String, record: &ZipFileEntry) -> Entry {
        if record.is_directory {
            return Entry::directory(path);
        }

        let content = if self.policy.is_text_path(&path) {
            self.decode_text(&path, record).await
        } else {
            None
        };

        Entry {
            path,
            is_directory: false,
            content,
            size: Some(record.uncompressed_size),
        }
    }

    async fn decode_text(&self, path: &str, record: &ZipFileEntry) -> Option<String> {
        let data = match self.archive.extract_to_memory(record).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(path, error = %format!("{:#}", e), "failed to read entry, treating as binary");
                return None;
            }
        };

        match String::from_utf8(data) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(path, error = %e, "entry is not valid UTF-8, treating as binary");
                None
            }
        }
    }
}

/// Extract the entries of an archive held in memory.
pub async fn extract(bytes: impl Into<Vec<u8>>) -> Result<Vec<Entry>, ArchiveFormatError> {
    EntryExtractor::new(Arc::new(MemoryReader::new(bytes)))
        .extract()
        .await
}
