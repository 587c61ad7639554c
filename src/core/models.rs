//! Core data models for the HLS stream tool

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A playlist document as fetched from the source URL.
///
/// Held in memory only for the duration of one operation or poll tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistSnapshot {
    pub content: String,

    pub fetched_at: DateTime<Utc>,
}

impl PlaylistSnapshot {
    pub fn new(content: String) -> Self {
        Self {
            content,
            fetched_at: Utc::now(),
        }
    }
}

/// Result of a single segment fetch within a batch.

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum SegmentStatus {
    Saved { path: PathBuf, bytes: u64 },

    Failed { error: String },
}

/// Per-segment record of a bounded download batch.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentOutcome {
    pub index: usize,

    pub url: String,

    pub status: SegmentStatus,
}

impl SegmentOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self.status, SegmentStatus::Saved { .. })
    }
}

/// Ordered outcomes of one bounded download batch.
///
/// Outcome order matches playlist order for the fetched batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<SegmentOutcome>,
}

impl BatchReport {
    pub fn saved_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_saved()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.saved_count()
    }
}

/// Emitted by the monitor when the playlist text changed since the
/// previous tick.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeReport {
    pub observed_at: DateTime<Utc>,

    pub segment_count: usize,
}

/// Application error types

#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("External tool '{tool}' failed: {message}")]
    Tool { tool: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for stream operations
pub type StreamResult<T> = Result<T, StreamError>;
