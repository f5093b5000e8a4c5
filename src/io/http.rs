use async_trait::async_trait;
use reqwest::header::{ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, RANGE};
use reqwest::{Client, StatusCode};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::ReadAt;
use anyhow::{Context, Result, anyhow, bail};

/// Network settings for [`HttpRangeReader`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpOptions {
    /// Limit for a whole request, body included
    pub timeout: Duration,
    /// Attempts per range request before giving up
    pub max_attempts: u32,
    /// Pause before the first retry; the n-th retry waits n times as long
    pub retry_delay: Duration,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 10,
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// Remote archive read through HTTP Range requests
pub struct HttpRangeReader {
    client: Client,
    url: String,
    size: u64,
    options: HttpOptions,
    transferred_bytes: AtomicU64,
}

impl HttpRangeReader {
    pub async fn new(url: String) -> Result<Self> {
        Self::with_options(url, HttpOptions::default()).await
    }

    /// Connect to `url` with explicit network settings.
    ///
    /// A HEAD request must report `Accept-Ranges: bytes` and a
    /// `Content-Length`, which becomes the archive size.
    pub async fn with_options(url: String, options: HttpOptions) -> Result<Self> {
        let client = Client::builder().timeout(options.timeout).build()?;

        let resp = client
            .head(&url)
            .send()
            .await
            .with_context(|| format!("HEAD request for {} failed", url))?;
        if !resp.status().is_success() {
            bail!("HTTP request for {} failed with status: {}", url, resp.status());
        }

        let headers = resp.headers();
        let accepts_bytes = headers
            .get(ACCEPT_RANGES)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("bytes"));
        if !accepts_bytes {
            bail!("Remote server does not support Range requests: {}", url);
        }

        let size = headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| anyhow!("Remote server did not return Content-Length for {}", url))?;

        tracing::debug!(%url, size, "opened remote archive");

        Ok(Self {
            client,
            url,
            size,
            options,
            transferred_bytes: AtomicU64::new(0),
        })
    }

    /// Total bytes received so far
    pub fn transferred_bytes(&self) -> u64 {
        self.transferred_bytes.load(Ordering::Relaxed)
    }

    /// One GET for `start..=end`. Only transport failures are `Err` in the
    /// outer result; protocol violations are fatal and go in the inner one.
    async fn fetch_range(&self, start: u64, end: u64) -> reqwest::Result<Result<Vec<u8>>> {
        let resp = self
            .client
            .get(&self.url)
            .header(RANGE, format!("bytes={}-{}", start, end))
            .send()
            .await?;

        if resp.status() != StatusCode::PARTIAL_CONTENT {
            return Ok(Err(anyhow!(
                "Range request for {} failed with status: {}",
                self.url,
                resp.status()
            )));
        }

        // "bytes <first>-<last>/<total>"; a server that ignores the
        // requested start would silently corrupt the archive
        let served_start = resp
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("bytes "))
            .and_then(|v| v.split('-').next())
            .and_then(|v| v.parse::<u64>().ok());
        if let Some(served) = served_start.filter(|&served| served != start) {
            return Ok(Err(anyhow!(
                "Remote server answered bytes={}- with a range starting at {}",
                start,
                served
            )));
        }

        let bytes = resp.bytes().await?;
        if bytes.is_empty() {
            return Ok(Err(anyhow!(
                "Remote server returned an empty range for bytes={}-{}",
                start,
                end
            )));
        }
        Ok(Ok(bytes.to_vec()))
    }
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_body()
}

#[async_trait]
impl ReadAt for HttpRangeReader {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() || offset >= self.size {
            return Ok(0);
        }

        let end = (offset + buf.len() as u64 - 1).min(self.size - 1);
        let wanted = (end - offset + 1) as usize;

        let mut received = 0;
        let mut attempt = 0;
        while received < wanted {
            let start = offset + received as u64;
            match self.fetch_range(start, end).await {
                Ok(chunk) => {
                    let chunk = chunk?;
                    let len = chunk.len().min(wanted - received);
                    buf[received..received + len].copy_from_slice(&chunk[..len]);
                    received += len;
                    self.transferred_bytes.fetch_add(len as u64, Ordering::Relaxed);
                }
                Err(e) if is_transient(&e) => {
                    attempt += 1;
                    if attempt >= self.options.max_attempts {
                        return Err(e).with_context(|| {
                            format!("Giving up on {} after {} attempts", self.url, attempt)
                        });
                    }
                    tracing::warn!(
                        url = %self.url,
                        attempt,
                        max_attempts = self.options.max_attempts,
                        error = %e,
                        "range request failed, retrying"
                    );
                    tokio::time::sleep(self.options.retry_delay * attempt).await;
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("Range request for {} failed", self.url));
                }
            }
        }

        Ok(received)
    }

    fn size(&self) -> u64 {
        self.size
    }
}
