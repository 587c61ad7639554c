//! Playlist change monitoring

use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::core::config::StreamConfig;
use crate::core::fetcher::PlaylistFetcher;
use crate::core::models::{ChangeReport, StreamResult};
use crate::parsers::playlist;

/// Polls the playlist and reports whenever its text changes.
///
/// Comparison is whole-document string equality: any byte change counts
/// as a change, including whitespace or live metadata unrelated to the
/// segment URLs.
pub struct PlaylistMonitor<'a> {
    fetcher: &'a PlaylistFetcher,
    request_timeout: Duration,
    poll_interval: Duration,
    retry_interval: Duration,
    last_content: String,
}

impl<'a> PlaylistMonitor<'a> {
    pub fn new(fetcher: &'a PlaylistFetcher, config: &StreamConfig) -> Self {
        Self {
            fetcher,
            request_timeout: config.monitor_timeout(),
            poll_interval: config.poll_interval(),
            retry_interval: config.retry_interval(),
            last_content: String::new(),
        }
    }

    /// One fetch-and-compare cycle.
    ///
    /// Returns a change report when the playlist text differs from the
    /// previous tick, `None` when it is identical.
    pub async fn tick(&mut self) -> StreamResult<Option<ChangeReport>> {
        let snapshot = self.fetcher.fetch_playlist(self.request_timeout).await?;

        if snapshot.content == self.last_content {
            return Ok(None);
        }

        let segment_count = playlist::segment_count(&snapshot.content);
        self.last_content = snapshot.content;

        Ok(Some(ChangeReport {
            observed_at: snapshot.fetched_at,
            segment_count,
        }))
    }

    /// Poll until the token is cancelled.
    ///
    /// A failed tick is transient: it is logged and the next wait uses the
    /// shorter retry interval. Cancellation is checked at tick boundaries;
    /// an in-flight request is only bounded by its own timeout.
    pub async fn run<F>(&mut self, cancel: CancellationToken, mut on_change: F)
    where
        F: FnMut(&ChangeReport),
    {
        while !cancel.is_cancelled() {
            let delay = match self.tick().await {
                Ok(Some(report)) => {
                    tracing::info!("Playlist updated - {} segments", report.segment_count);
                    on_change(&report);
                    self.poll_interval
                }
                Ok(None) => self.poll_interval,
                Err(error) => {
                    tracing::warn!("Poll failed: {}", error);
                    self.retry_interval
                }
            };

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = sleep(delay) => {}
            }
        }

        tracing::debug!("Poll loop exited");
    }
}
