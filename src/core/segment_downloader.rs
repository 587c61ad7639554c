//! Bounded sequential segment downloading

use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;

use crate::core::config::StreamConfig;
use crate::core::fetcher::PlaylistFetcher;
use crate::core::models::{BatchReport, SegmentOutcome, SegmentStatus, StreamResult};

/// File extension for persisted transport-stream segments
const SEGMENT_EXTENSION: &str = "ts";

/// Downloads a bounded batch of segments, one at a time, in playlist order.
///
/// The loop is sequential on purpose: segment order matters for
/// reassembly, and this tool never reorders or merges parallel fetches.
pub struct SegmentDownloader<'a> {
    fetcher: &'a PlaylistFetcher,
    output_dir: PathBuf,
    prefix: String,
    timeout: Duration,
    pacing: Duration,
}

impl<'a> SegmentDownloader<'a> {
    pub fn new(fetcher: &'a PlaylistFetcher, config: &StreamConfig) -> Self {
        Self {
            fetcher,
            output_dir: PathBuf::from(&config.output_directory),
            prefix: config.segment_prefix.clone(),
            timeout: config.segment_timeout(),
            pacing: config.segment_delay(),
        }
    }

    /// Target path for the segment at a zero-based batch index.
    pub fn segment_path(&self, index: usize) -> PathBuf {
        self.output_dir
            .join(format!("{}{:03}.{}", self.prefix, index, SEGMENT_EXTENSION))
    }

    /// Fetch up to `requested` segments from the ordered URL sequence.
    ///
    /// A transport or write failure on one segment is recorded and the
    /// batch continues with the next; the pacing delay applies between
    /// attempts regardless of their outcome.
    pub async fn download_batch(
        &self,
        urls: &[String],
        requested: usize,
    ) -> StreamResult<BatchReport> {
        let count = requested.min(urls.len());
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let mut report = BatchReport::default();

        for (index, url) in urls.iter().take(count).enumerate() {
            tracing::info!("Downloading segment {}/{}", index + 1, count);

            let path = self.segment_path(index);
            let status = match self.fetcher.fetch_segment_to(url, &path, self.timeout).await {
                Ok(bytes) => {
                    tracing::info!("Saved {} ({} bytes)", path.display(), bytes);
                    SegmentStatus::Saved { path, bytes }
                }
                Err(error) => {
                    tracing::warn!("Failed segment {}: {}", index, error);
                    SegmentStatus::Failed {
                        error: error.to_string(),
                    }
                }
            };

            report.outcomes.push(SegmentOutcome {
                index,
                url: url.clone(),
                status,
            });

            if index + 1 < count && !self.pacing.is_zero() {
                sleep(self.pacing).await;
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_paths_are_zero_padded() {
        let mut config = StreamConfig::default();
        config.output_directory = "out".to_string();
        let fetcher = PlaylistFetcher::new(&config).unwrap();
        let downloader = SegmentDownloader::new(&fetcher, &config);

        assert_eq!(
            downloader.segment_path(7),
            PathBuf::from("out/segment_007.ts")
        );
        assert_eq!(
            downloader.segment_path(0),
            PathBuf::from("out/segment_000.ts")
        );
        assert_eq!(
            downloader.segment_path(123),
            PathBuf::from("out/segment_123.ts")
        );
    }
}
