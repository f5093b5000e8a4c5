use thiserror::Error;

/// The input bytes could not be read as a ZIP archive.
///
/// Carries the decoder's message. Never retried: a corrupt archive stays corrupt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to load ZIP file: {message}")]
pub struct ArchiveFormatError {
    pub message: String,
}

impl ArchiveFormatError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for ArchiveFormatError {
    fn from(err: anyhow::Error) -> Self {
        // Alternate formatting keeps the whole context chain on one line
        Self::new(format!("{:#}", err))
    }
}
