/// Construction-time defaults for both surfaces.
///
/// Kept in one place instead of scattered literals so callers decide what
/// a session starts with.
#[derive(Debug, Clone)]
pub struct SiftConfig {
    /// Pre-filled base URL shown in the TUI input field.
    pub default_base_url: String,
    /// Timeout for the warm-up request issued when a scanner connects.
    pub probe_timeout_secs: u64,
    /// Timeout for analysis and per-page crawl requests.
    pub fetch_timeout_secs: u64,
    /// Hard cap on records collected by one section crawl.
    pub max_pages: usize,
}

impl Default for SiftConfig {
    fn default() -> Self {
        Self {
            default_base_url: "https://example.com/admin".to_string(),
            probe_timeout_secs: 5,
            fetch_timeout_secs: 10,
            max_pages: 100,
        }
    }
}
