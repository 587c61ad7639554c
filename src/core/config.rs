//! Application configuration management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::utils::network;

/// Main application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub stream: StreamConfig,
    pub tools: ToolsConfig,
}

/// Stream source and fetch behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Playlist URL the tool operates on
    pub playlist_url: String,

    pub user_agent: String,

    /// Static request headers sent with every call
    pub headers: HashMap<String, String>,

    /// Per-call timeout for playlist requests (seconds)
    pub playlist_timeout_secs: u64,

    /// Per-call timeout for playlist requests inside the monitor loop (seconds)
    pub monitor_timeout_secs: u64,

    /// Per-call timeout for segment bodies (seconds)
    pub segment_timeout_secs: u64,

    /// Pacing delay between consecutive segment fetches (milliseconds)
    pub segment_delay_ms: u64,

    /// Monitor wait after a successful poll tick (seconds)
    pub poll_interval_secs: u64,

    /// Monitor wait after a failed poll tick (seconds)
    pub retry_interval_secs: u64,

    pub output_directory: String,

    /// Filename prefix for downloaded segments
    pub segment_prefix: String,
}

/// External transcode/playback tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    pub ffmpeg_program: String,
    pub ffplay_program: String,
    pub window_title: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            stream: StreamConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            playlist_url: "https://het100a.4rouwanda-shop.store/live/69854211/index.m3u8"
                .to_string(),
            user_agent: network::default_user_agent().to_string(),
            headers: network::default_headers(),
            playlist_timeout_secs: 10,
            monitor_timeout_secs: 5,
            segment_timeout_secs: 30,
            segment_delay_ms: 500,
            poll_interval_secs: 10,
            retry_interval_secs: 5,
            output_directory: ".".to_string(),
            segment_prefix: "segment_".to_string(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg_program: "ffmpeg".to_string(),
            ffplay_program: "ffplay".to_string(),
            window_title: "HLS Stream".to_string(),
        }
    }
}

impl StreamConfig {
    pub fn playlist_timeout(&self) -> Duration {
        Duration::from_secs(self.playlist_timeout_secs)
    }

    pub fn monitor_timeout(&self) -> Duration {
        Duration::from_secs(self.monitor_timeout_secs)
    }

    pub fn segment_timeout(&self) -> Duration {
        Duration::from_secs(self.segment_timeout_secs)
    }

    pub fn segment_delay(&self) -> Duration {
        Duration::from_millis(self.segment_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }
}

impl AppConfig {
    /// Load configuration from file, creating default if not exists
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

            let config: AppConfig =
                serde_json::from_str(&content).with_context(|| "Failed to parse config file")?;

            tracing::info!("Loaded configuration from: {:?}", config_path);
            Ok(config)
        } else {
            let config = Self::default();
            config.save()?;
            tracing::info!("Created default configuration at: {:?}", config_path);
            Ok(config)
        }
    }

    /// Load configuration, falling back to defaults on any load or
    /// validation failure.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => {
                if let Err(err) = config.validate() {
                    tracing::warn!(
                        "Invalid configuration detected ({}), falling back to defaults",
                        err
                    );
                    Self::default()
                } else {
                    config
                }
            }
            Err(err) => {
                tracing::warn!(
                    "Failed to load configuration from disk: {}. Using defaults",
                    err
                );
                Self::default()
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        tracing::info!("Saved configuration to: {:?}", config_path);
        Ok(())
    }

    /// Get the path to the configuration file
    pub fn get_config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "hlsstreamtool", "cli")
            .with_context(|| "Failed to get project directories")?;

        let config_dir = project_dirs.config_dir();
        Ok(config_dir.join("config.json"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.stream.playlist_url)
            .with_context(|| format!("Invalid playlist URL: {}", self.stream.playlist_url))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!("Playlist URL must use http or https: {}", url);
        }

        if self.stream.user_agent.is_empty() {
            anyhow::bail!("User agent must not be empty");
        }

        for secs in [
            self.stream.playlist_timeout_secs,
            self.stream.monitor_timeout_secs,
            self.stream.segment_timeout_secs,
        ] {
            if secs == 0 || secs > 300 {
                anyhow::bail!("Timeouts should be between 1 and 300 seconds");
            }
        }

        if self.stream.segment_delay_ms > 60_000 {
            anyhow::bail!("Segment delay should not exceed 60 seconds");
        }

        if self.stream.poll_interval_secs == 0 || self.stream.retry_interval_secs == 0 {
            anyhow::bail!("Monitor intervals must be greater than 0");
        }

        if self.stream.segment_prefix.is_empty() {
            anyhow::bail!("Segment prefix must not be empty");
        }

        if self.tools.ffmpeg_program.is_empty() || self.tools.ffplay_program.is_empty() {
            anyhow::bail!("External tool programs must not be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.stream.playlist_url, config.stream.playlist_url);
        assert_eq!(parsed.stream.segment_prefix, config.stream.segment_prefix);
        assert_eq!(parsed.tools.ffmpeg_program, config.tools.ffmpeg_program);
    }

    #[test]
    fn test_invalid_config_validation() {
        let mut config = AppConfig::default();
        config.stream.playlist_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.stream.playlist_url = "ftp://example.com/index.m3u8".to_string();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.stream.playlist_timeout_secs = 0;
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.stream.segment_prefix = String::new();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.tools.ffmpeg_program = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duration_accessors() {
        let config = StreamConfig::default();
        assert_eq!(config.playlist_timeout(), Duration::from_secs(10));
        assert_eq!(config.monitor_timeout(), Duration::from_secs(5));
        assert_eq!(config.segment_timeout(), Duration::from_secs(30));
        assert_eq!(config.segment_delay(), Duration::from_millis(500));
    }
}
