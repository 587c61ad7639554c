//! Playlist and segment retrieval over HTTP

use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::core::config::StreamConfig;
use crate::core::models::{PlaylistSnapshot, StreamError, StreamResult};

/// HTTP retriever for the playlist document and its segment bodies.
///
/// The static user-agent and accept headers are applied as client defaults
/// at construction; there is no other session state.
pub struct PlaylistFetcher {
    client: Client,
    playlist_url: String,
}

impl PlaylistFetcher {
    pub fn new(config: &StreamConfig) -> StreamResult<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| StreamError::Config(format!("Invalid header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| StreamError::Config(format!("Invalid header value: {e}")))?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            playlist_url: config.playlist_url.clone(),
        })
    }

    pub fn playlist_url(&self) -> &str {
        &self.playlist_url
    }

    /// Fetch the playlist document.
    ///
    /// Any received body is returned, even on a non-success status; only
    /// transport failures (connect, timeout, body read) are errors.
    pub async fn fetch_playlist(&self, timeout: Duration) -> StreamResult<PlaylistSnapshot> {
        let response = self
            .client
            .get(&self.playlist_url)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Playlist request returned status {}, using body anyway", status);
        }

        let content = response.text().await?;
        Ok(PlaylistSnapshot::new(content))
    }

    /// Stream a segment body to the given path, returning bytes written.
    pub async fn fetch_segment_to(
        &self,
        url: &str,
        path: &Path,
        timeout: Duration,
    ) -> StreamResult<u64> {
        let response = self.client.get(url).timeout(timeout).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Segment request returned status {}, using body anyway", status);
        }

        let mut file = File::create(path).await?;
        let mut stream = response.bytes_stream();
        let mut total_size = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            total_size += chunk.len() as u64;
            file.write_all(&chunk).await?;
        }

        file.flush().await?;
        Ok(total_size)
    }
}
