//! User-facing operations behind the CLI surface
//!
//! Each operation builds its collaborators from the passed configuration,
//! prints its results on stdout, and reports failures through `anyhow` so
//! the binary can decide whether to abort or stay in the menu.

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use crate::core::config::AppConfig;
use crate::core::external;
use crate::core::fetcher::PlaylistFetcher;
use crate::core::models::{BatchReport, SegmentStatus};
use crate::core::monitor::PlaylistMonitor;
use crate::core::segment_downloader::SegmentDownloader;
use crate::parsers::playlist;

/// Fetch the playlist and download up to `count` segments in order.
///
/// A playlist-retrieval failure aborts the operation; per-segment
/// failures are reported in the batch summary instead.
pub async fn download(config: &AppConfig, count: usize) -> Result<BatchReport> {
    let fetcher = PlaylistFetcher::new(&config.stream)?;

    println!("Downloading segments...");
    let snapshot = fetcher
        .fetch_playlist(config.stream.playlist_timeout())
        .await
        .context("Failed to fetch playlist")?;

    let urls = playlist::extract_segment_urls(&snapshot.content);
    println!("Found {} segments", urls.len());

    let downloader = SegmentDownloader::new(&fetcher, &config.stream);
    let report = downloader.download_batch(&urls, count).await?;

    for outcome in &report.outcomes {
        match &outcome.status {
            SegmentStatus::Saved { path, .. } => println!("Saved {}", path.display()),
            SegmentStatus::Failed { error } => {
                println!("Failed segment {}: {}", outcome.index, error)
            }
        }
    }
    println!(
        "Done: {} saved, {} failed",
        report.saved_count(),
        report.failed_count()
    );

    Ok(report)
}

/// Record the stream for `duration_secs` seconds into `output`.
pub async fn record(config: &AppConfig, duration_secs: u64, output: &str) -> Result<()> {
    println!("Recording {duration_secs}s to {output}...");

    external::record_stream(
        &config.tools,
        &config.stream.playlist_url,
        duration_secs,
        output,
    )
    .await
    .context("Recording failed")?;

    println!("Saved to {output}");
    Ok(())
}

/// Play the stream in an external player window.
pub async fn play(config: &AppConfig) -> Result<()> {
    println!("Playing stream...");

    external::play_stream(&config.tools, &config.stream.playlist_url)
        .await
        .context("Playback failed")?;

    Ok(())
}

/// Print the raw playlist and a preview of its segment URLs.
pub async fn info(config: &AppConfig) -> Result<()> {
    let fetcher = PlaylistFetcher::new(&config.stream)?;

    println!("Getting stream info...");
    let snapshot = fetcher
        .fetch_playlist(config.stream.playlist_timeout())
        .await
        .context("Failed to fetch playlist")?;

    println!("=== PLAYLIST CONTENT ===");
    println!("{}", snapshot.content);

    println!("=== SEGMENT URLS ===");
    let urls = playlist::extract_segment_urls(&snapshot.content);
    for url in urls.iter().take(5) {
        println!("{url}");
    }
    if urls.len() > 5 {
        println!("... and {} more", urls.len() - 5);
    }

    Ok(())
}

/// Watch the playlist for changes until the token is cancelled.
pub async fn monitor(config: &AppConfig, cancel: CancellationToken) -> Result<()> {
    let fetcher = PlaylistFetcher::new(&config.stream)?;
    let mut monitor = PlaylistMonitor::new(&fetcher, &config.stream);

    println!("Monitoring stream (Ctrl+C to stop)...");
    monitor
        .run(cancel, |report| {
            let local = report.observed_at.with_timezone(&chrono::Local);
            println!(
                "[{}] Playlist updated - {} segments",
                local.format("%H:%M:%S"),
                report.segment_count
            );
        })
        .await;

    println!("Monitoring stopped");
    Ok(())
}
