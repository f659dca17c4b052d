use anyhow::{anyhow, Result};
use async_trait::async_trait;
use slidegen_common::{image_url, EXPORT_IMAGE_SIZE};
use std::time::Duration;
use tracing::debug;

/// Supplies picture bytes for a slide's image description.
#[async_trait]
pub trait ImageSource {
    /// `Ok(None)` means no picture is wanted; the slide gets a placeholder.
    async fn fetch(&self, description: &str) -> Result<Option<Vec<u8>>>;
}

/// Largest image body accepted before the download is abandoned.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Downloads a synthesised image from a prompt-in-path endpoint.
pub struct HttpImageSource {
    base_url: String,
    size: (u32, u32),
    max_bytes: usize,
    http: reqwest::Client,
}

impl HttpImageSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("failed to build http client: {e}"))?;
        Ok(Self {
            base_url: base_url.into(),
            size: EXPORT_IMAGE_SIZE,
            max_bytes: MAX_IMAGE_BYTES,
            http,
        })
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn url_for(&self, description: &str) -> String {
        image_url(&self.base_url, description, self.size)
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, description: &str) -> Result<Option<Vec<u8>>> {
        let url = self.url_for(description);
        debug!("fetching image {url}");
        let mut resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("image request failed: {e}"))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("image http {status}"));
        }
        if let Some(len) = resp.content_length() {
            if len > self.max_bytes as u64 {
                return Err(anyhow!("image is {len} bytes, limit is {}", self.max_bytes));
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = resp
            .chunk()
            .await
            .map_err(|e| anyhow!("image download failed: {e}"))?
        {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(anyhow!("image exceeds {} bytes", self.max_bytes));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(Some(body))
    }
}

/// Never fetches; every image becomes a placeholder.
pub struct NoImageSource;

#[async_trait]
impl ImageSource for NoImageSource {
    async fn fetch(&self, _description: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }
}
