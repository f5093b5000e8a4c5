mod http;
mod local;
mod memory;
mod source;

pub use http::{HttpOptions, HttpRangeReader};
pub use local::LocalFileReader;
pub use memory::MemoryReader;
pub use source::{ArchiveSource, is_http_url};

use anyhow::{Result, bail};
use async_trait::async_trait;

/// Trait for random access reading from an archive source
#[async_trait]
pub trait ReadAt: Send + Sync {
    /// Read data at the specified offset into the buffer
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize>;

    /// Get the total size of the data source
    fn size(&self) -> u64;

    /// Fill the whole buffer from `offset`, failing if the source ends early
    async fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let end = offset.checked_add(buf.len() as u64);
        if end.is_none_or(|end| end > self.size()) {
            bail!(
                "Read of {} bytes at offset {} is past the end of the archive ({} bytes)",
                buf.len(),
                offset,
                self.size()
            );
        }

        let mut filled = 0;
        while filled < buf.len() {
            let n = self
                .read_at(offset + filled as u64, &mut buf[filled..])
                .await?;
            if n == 0 {
                bail!("Unexpected end of archive at offset {}", offset + filled as u64);
            }
            filled += n;
        }

        Ok(())
    }
}
