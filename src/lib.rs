//! # zipdiff
//!
//! Compare two ZIP archives and report which paths were added, removed,
//! modified or left unchanged, with unified diffs for modified text files.
//!
//! Archives are read through the [`ReadAt`] trait, so the same engine works
//! on in-memory buffers, local files and remote HTTP URLs (via Range
//! requests). Extraction of the two sides runs concurrently; classification
//! is a pure function over the two entry lists.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use zipdiff::{CompareOptions, MemoryReader, compare_archives};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let left = Arc::new(MemoryReader::new(std::fs::read("v1.zip")?));
//!     let right = Arc::new(MemoryReader::new(std::fs::read("v2.zip")?));
//!
//!     let result = compare_archives(left, right, &CompareOptions::default()).await?;
//!     for path in &result.modified {
//!         println!("modified: {}", path);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod diff;
pub mod error;
pub mod io;
pub mod report;
pub mod zip;

pub use cli::Cli;
pub use diff::{
    ChangeKind, CompareOptions, DiffResult, DiffStats, Entry, EntryExtractor, TextPolicy, compare,
    compare_archives, compare_with, extract,
};
pub use error::ArchiveFormatError;
pub use io::{ArchiveSource, HttpOptions, HttpRangeReader, LocalFileReader, MemoryReader, ReadAt};
pub use report::{CompareResponse, ReportOptions, render_text};
