use super::ReadAt;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Archive on the local filesystem.
///
/// Reads are positional and never move a shared cursor, so concurrent
/// reads from the central directory and entry data do not interfere.
pub struct LocalFileReader {
    path: PathBuf,
    file: File,
    size: u64,
}

impl LocalFileReader {
    pub fn new(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let size = file
            .metadata()
            .with_context(|| format!("Failed to stat {}", path.display()))?
            .len();
        tracing::debug!(path = %path.display(), size, "opened local archive");
        Ok(Self {
            path: path.to_path_buf(),
            file,
            size,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(unix)]
    fn pread(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        use std::os::unix::fs::FileExt;
        self.file.read_at(buf, offset)
    }

    #[cfg(windows)]
    fn pread(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        use std::os::windows::fs::FileExt;
        self.file.seek_read(buf, offset)
    }

    #[cfg(not(any(unix, windows)))]
    fn pread(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        use std::io::{Read, Seek, SeekFrom};
        let mut file = &self.file;
        file.seek(SeekFrom::Start(offset))?;
        file.read(buf)
    }
}

#[async_trait]
impl ReadAt for LocalFileReader {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let len = buf.len();
        self.pread(offset, buf).with_context(|| {
            format!(
                "Failed to read {} bytes at offset {} from {}",
                len,
                offset,
                self.path.display()
            )
        })
    }

    fn size(&self) -> u64 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_at_offsets_in_any_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"0123456789").unwrap();

        let reader = LocalFileReader::new(file.path()).unwrap();
        assert_eq!(reader.size(), 10);
        assert_eq!(reader.path(), file.path());

        let mut tail = [0u8; 3];
        reader.read_exact_at(7, &mut tail).await.unwrap();
        assert_eq!(&tail, b"789");

        let mut head = [0u8; 4];
        reader.read_exact_at(0, &mut head).await.unwrap();
        assert_eq!(&head, b"0123");

        let mut past_end = [0u8; 4];
        assert!(reader.read_exact_at(8, &mut past_end).await.is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.zip");
        let err = LocalFileReader::new(&missing).err().unwrap();
        assert!(err.to_string().contains("absent.zip"));
    }
}
