//! Network utilities and helpers

use std::collections::HashMap;
use std::time::Duration;

/// Default request timeout for playlist documents
pub const DEFAULT_PLAYLIST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default request timeout for segment bodies
pub const DEFAULT_SEGMENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Get user agent string
pub fn default_user_agent() -> &'static str {
    "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/115.0"
}

/// Static headers sent with every request.
///
/// Content encoding negotiation is left to the HTTP client so response
/// bodies arrive decoded.
pub fn default_headers() -> HashMap<String, String> {
    HashMap::from([
        ("Accept".to_string(), "*/*".to_string()),
        ("Accept-Language".to_string(), "en-US,en;q=0.5".to_string()),
        ("Connection".to_string(), "keep-alive".to_string()),
    ])
}
