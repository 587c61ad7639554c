//! Playlist monitor integration tests
//!
//! Drives the tick state machine and the cancellable poll loop against a
//! fixture server whose playlist text can change between requests.

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::routing::get;
    use axum::Router;
    use tokio::net::TcpListener;
    use tokio_util::sync::CancellationToken;

    use crate::core::config::StreamConfig;
    use crate::core::fetcher::PlaylistFetcher;
    use crate::core::models::StreamError;
    use crate::core::monitor::PlaylistMonitor;

    async fn spawn_live_fixture(content: Arc<Mutex<String>>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let app = Router::new().route(
            "/live.m3u8",
            get(move || {
                let content = content.clone();
                async move { content.lock().unwrap().clone() }
            }),
        );
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        base
    }

    fn test_config(playlist_url: String) -> StreamConfig {
        let mut config = StreamConfig::default();
        config.playlist_url = playlist_url;
        config.monitor_timeout_secs = 5;
        config.poll_interval_secs = 1;
        config.retry_interval_secs = 1;
        config
    }

    #[tokio::test]
    async fn tick_reports_changes_and_stays_silent_between() {
        let content = Arc::new(Mutex::new("#EXTM3U\nhttp://x/s0.ts\n".to_string()));
        let base = spawn_live_fixture(content.clone()).await;

        let config = test_config(format!("{base}/live.m3u8"));
        let fetcher = PlaylistFetcher::new(&config).unwrap();
        let mut monitor = PlaylistMonitor::new(&fetcher, &config);

        // the first observed document always differs from the empty
        // initial state
        let first = monitor.tick().await.unwrap();
        assert_eq!(first.map(|r| r.segment_count), Some(1));

        let second = monitor.tick().await.unwrap();
        assert!(second.is_none());

        *content.lock().unwrap() = "#EXTM3U\nhttp://x/s0.ts\nhttp://x/s1.ts\n".to_string();

        let third = monitor.tick().await.unwrap();
        assert_eq!(third.map(|r| r.segment_count), Some(2));

        let fourth = monitor.tick().await.unwrap();
        assert!(fourth.is_none());
    }

    #[tokio::test]
    async fn one_byte_difference_triggers_exactly_one_report() {
        let content = Arc::new(Mutex::new("#EXTM3U\nhttp://x/a.ts\n".to_string()));
        let base = spawn_live_fixture(content.clone()).await;

        let config = test_config(format!("{base}/live.m3u8"));
        let fetcher = PlaylistFetcher::new(&config).unwrap();
        let mut monitor = PlaylistMonitor::new(&fetcher, &config);

        assert!(monitor.tick().await.unwrap().is_some());

        // whitespace-only change still counts, segment count unchanged
        content.lock().unwrap().push(' ');

        let report = monitor.tick().await.unwrap();
        assert_eq!(report.map(|r| r.segment_count), Some(1));
        assert!(monitor.tick().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn tick_propagates_transport_errors() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut config = test_config(format!("http://{addr}/live.m3u8"));
        config.monitor_timeout_secs = 1;
        let fetcher = PlaylistFetcher::new(&config).unwrap();
        let mut monitor = PlaylistMonitor::new(&fetcher, &config);

        let result = monitor.tick().await;
        assert!(matches!(result, Err(StreamError::Transport(_))));
    }

    #[tokio::test]
    async fn run_exits_on_cancellation() {
        let content = Arc::new(Mutex::new("#EXTM3U\nhttp://x/s0.ts\n".to_string()));
        let base = spawn_live_fixture(content).await;

        let config = test_config(format!("{base}/live.m3u8"));
        let fetcher = PlaylistFetcher::new(&config).unwrap();
        let mut monitor = PlaylistMonitor::new(&fetcher, &config);

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let mut changes = Vec::new();
        tokio::time::timeout(
            Duration::from_secs(5),
            monitor.run(cancel, |report| changes.push(report.segment_count)),
        )
        .await
        .expect("poll loop should stop after cancellation");

        assert_eq!(changes, vec![1]);
    }

    #[tokio::test]
    async fn run_returns_immediately_when_already_cancelled() {
        let config = test_config("http://127.0.0.1:9/live.m3u8".to_string());
        let fetcher = PlaylistFetcher::new(&config).unwrap();
        let mut monitor = PlaylistMonitor::new(&fetcher, &config);

        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut changes = Vec::new();
        tokio::time::timeout(
            Duration::from_secs(1),
            monitor.run(cancel, |report| changes.push(report.segment_count)),
        )
        .await
        .expect("cancelled loop should not poll");

        assert!(changes.is_empty());
    }
}
