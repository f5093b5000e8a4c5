//! Archive comparison engine.
//!
//! - [`extract`]: archive bytes to a path-sorted list of [`Entry`]
//! - [`compare`]: two entry lists to a classified [`DiffResult`]
//! - [`unified`]: unified diff text for modified text files

mod compare;
mod entry;
mod extract;
mod unified;

use std::sync::Arc;

use crate::error::ArchiveFormatError;
use crate::io::ReadAt;

pub use compare::{ChangeKind, CompareOptions, DiffResult, DiffStats, compare, compare_with};
pub use entry::{Entry, TEXT_FILE_EXTENSIONS, TextPolicy, is_text_path, normalize_path};
pub use extract::{EntryExtractor, extract};
pub use unified::unified_diff;

/// Extract both archives concurrently, then compare them.
///
/// Each extraction runs as its own task, so on a multi-threaded runtime
/// inflating one archive does not stall the other. Fails with the first
/// extraction error; no comparison is attempted unless both archives
/// were read.
pub async fn compare_archives<L, R>(
    left: Arc<L>,
    right: Arc<R>,
    options: &CompareOptions,
) -> Result<DiffResult, ArchiveFormatError>
where
    L: ReadAt + 'static,
    R: ReadAt + 'static,
{
    let left = spawn_extract(EntryExtractor::with_policy(left, options.policy.clone()));
    let right = spawn_extract(EntryExtractor::with_policy(right, options.policy.clone()));

    let (left_entries, right_entries) = tokio::try_join!(left, right)?;

    Ok(compare_with(&left_entries, &right_entries, options))
}

async fn spawn_extract<R: ReadAt + 'static>(
    extractor: EntryExtractor<R>,
) -> Result<Vec<Entry>, ArchiveFormatError> {
    match tokio::spawn(async move { extractor.extract().await }).await {
        Ok(entries) => entries,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => Err(ArchiveFormatError::new(format!("Extraction task failed: {}", e))),
    }
}
