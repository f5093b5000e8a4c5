use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

use super::{HttpOptions, HttpRangeReader, LocalFileReader, ReadAt};

pub fn is_http_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// An archive named on the command line: a local path or an HTTP(S) URL
pub enum ArchiveSource {
    Local(LocalFileReader),
    Http(HttpRangeReader),
}

impl ArchiveSource {
    /// Open `location`; `http` only applies to URLs
    pub async fn open(location: &str, http: &HttpOptions) -> Result<Self> {
        if is_http_url(location) {
            let reader = HttpRangeReader::with_options(location.to_string(), http.clone()).await?;
            Ok(Self::Http(reader))
        } else {
            Ok(Self::Local(LocalFileReader::new(Path::new(location))?))
        }
    }

    /// Bytes fetched over the network so far; zero for local files
    pub fn transferred_bytes(&self) -> u64 {
        match self {
            Self::Local(_) => 0,
            Self::Http(reader) => reader.transferred_bytes(),
        }
    }
}

#[async_trait]
impl ReadAt for ArchiveSource {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        match self {
            Self::Local(reader) => reader.read_at(offset, buf).await,
            Self::Http(reader) => reader.read_at(offset, buf).await,
        }
    }

    fn size(&self) -> u64 {
        match self {
            Self::Local(reader) => reader.size(),
            Self::Http(reader) => reader.size(),
        }
    }
}
