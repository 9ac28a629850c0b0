// src/config.rs
// =============================================================================
// Crawl configuration.
//
// The CLI builds one of these; tests build them directly with the with_*
// methods. Defaults match a polite crawl of a small site.
// =============================================================================

use std::time::Duration;

pub const DEFAULT_MAX_DEPTH: usize = 2;
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(200);
pub const DEFAULT_MAX_CONCURRENCY: usize = 16;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Absolute URL the crawl starts from; its host is the base domain
    pub seed: String,
    /// Deepest level visited (the seed is depth 0)
    pub max_depth: usize,
    /// Minimum spacing between two fetch issuances, crawl-wide
    pub min_interval: Duration,
    /// Maximum number of crawl tasks running at once
    pub max_concurrency: usize,
    /// Per-request timeout handed to the HTTP client
    pub request_timeout: Duration,
}

impl CrawlConfig {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            max_depth: DEFAULT_MAX_DEPTH,
            min_interval: DEFAULT_MIN_INTERVAL,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    /// A concurrency of 0 is treated as 1.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}
