//! Playlist text parsing utilities

/// Extract segment URLs from playlist text.
///
/// Every line whose content begins with the literal prefix `http` is taken
/// as a segment reference, in appearance order. No validation, no
/// deduplication. Relative segment references never match the prefix and
/// are dropped.
pub fn extract_segment_urls(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| line.starts_with("http"))
        .map(str::to_string)
        .collect()
}

/// Number of segment references in playlist text.
pub fn segment_count(content: &str) -> usize {
    content
        .lines()
        .filter(|line| line.starts_with("http"))
        .count()
}
