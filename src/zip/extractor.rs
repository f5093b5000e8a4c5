use std::io::Read;
use std::sync::Arc;

use flate2::Crc;
use flate2::read::DeflateDecoder;

use crate::io::ReadAt;
use anyhow::{Context, Result, bail};

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipFileEntry};

/// ZIP archive reader: lists records and decodes entry data
pub struct ZipExtractor<R: ReadAt> {
    parser: ZipParser<R>,
}

impl<R: ReadAt> ZipExtractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            parser: ZipParser::new(reader),
        }
    }

    /// List all records in the archive
    pub async fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        self.parser.list_files().await
    }

    /// Decode an entry's data into memory and verify its CRC-32
    pub async fn extract_to_memory(&self, entry: &ZipFileEntry) -> Result<Vec<u8>> {
        if entry.is_encrypted() {
            bail!("Encrypted entries are not supported");
        }

        let data_offset = self.parser.get_data_offset(entry).await?;

        // Sizes come from the Central Directory; never allocate past the archive end
        let archive_size = self.parser.reader().size();
        if data_offset
            .checked_add(entry.compressed_size)
            .is_none_or(|end| end > archive_size)
        {
            bail!(
                "Entry data ({} bytes at offset {}) extends past the end of the archive",
                entry.compressed_size,
                data_offset
            );
        }
        let compressed_len = usize::try_from(entry.compressed_size)
            .context("Entry is too large to hold in memory")?;

        let mut raw = vec![0u8; compressed_len];
        self.parser
            .reader()
            .read_exact_at(data_offset, &mut raw)
            .await?;

        let data = match entry.compression_method {
            CompressionMethod::Stored => raw,
            CompressionMethod::Deflate => inflate(&raw, entry.uncompressed_size)?,
            CompressionMethod::Unknown(method) => {
                bail!("Unsupported compression method: {}", method)
            }
        };

        if data.len() as u64 != entry.uncompressed_size {
            bail!(
                "Size mismatch: expected {} bytes, got {}",
                entry.uncompressed_size,
                data.len()
            );
        }

        let mut crc = Crc::new();
        crc.update(&data);
        if crc.sum() != entry.crc32 {
            bail!(
                "CRC-32 mismatch: expected {:08x}, got {:08x}",
                entry.crc32,
                crc.sum()
            );
        }

        Ok(data)
    }
}

/// Inflate raw DEFLATE data, reading at most one byte past the declared
/// size so an oversized stream is detected without being fully expanded.
fn inflate(raw: &[u8], uncompressed_size: u64) -> Result<Vec<u8>> {
    let capacity = usize::try_from(uncompressed_size).unwrap_or(0).min(raw.len() * 4);
    let mut data = Vec::with_capacity(capacity);
    DeflateDecoder::new(raw)
        .take(uncompressed_size.saturating_add(1))
        .read_to_end(&mut data)
        .context("Corrupt DEFLATE stream")?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::DeflateEncoder;
    use std::io::Write;

    #[test]
    fn inflates_deflate_stream() {
        let text = b"line one\nline two\nline one\nline two\n".repeat(8);
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&text).unwrap();
        let raw = encoder.finish().unwrap();

        assert_eq!(inflate(&raw, text.len() as u64).unwrap(), text);
    }

    #[test]
    fn oversized_stream_is_cut_one_past_declared_size() {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&[b'a'; 1000]).unwrap();
        let raw = encoder.finish().unwrap();

        assert_eq!(inflate(&raw, 10).unwrap().len(), 11);
    }

    #[test]
    fn garbage_is_not_deflate() {
        assert!(inflate(&[0xff, 0xff, 0xff, 0xff], 4).is_err());
    }
}
