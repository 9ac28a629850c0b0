// src/cli.rs
// =============================================================================
// Command-line interface, defined with clap's derive API.
//
// site-crawler https://example.com --max-depth 3 --interval-ms 500 --json
// =============================================================================

use crate::config::{
    CrawlConfig, DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_DEPTH, DEFAULT_MIN_INTERVAL,
    DEFAULT_REQUEST_TIMEOUT,
};
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "site-crawler",
    version,
    about = "Crawl a website politely, staying on its domain",
    long_about = "site-crawler starts at a seed URL and follows links on the same host up to a \
                  maximum depth, fetching every page at most once and never faster than the \
                  configured interval."
)]
pub struct Cli {
    /// URL to start from; its host bounds the crawl (e.g., https://example.com)
    pub seed_url: String,

    /// Maximum crawl depth
    ///
    /// Depth 0 = just the seed page
    /// Depth 1 = seed page + all pages it links to
    /// etc.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Minimum time between two requests, in milliseconds (0 disables pacing)
    #[arg(long, default_value_t = DEFAULT_MIN_INTERVAL.as_millis() as u64)]
    pub interval_ms: u64,

    /// Maximum number of pages being crawled at once
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig::new(self.seed_url.clone())
            .with_max_depth(self.max_depth)
            .with_min_interval(Duration::from_millis(self.interval_ms))
            .with_max_concurrency(self.concurrency)
            .with_request_timeout(Duration::from_secs(self.timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["site-crawler", "https://example.test/"]).unwrap();
        let config = cli.crawl_config();
        assert_eq!(config.seed, "https://example.test/");
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.min_interval, DEFAULT_MIN_INTERVAL);
        assert_eq!(config.max_concurrency, DEFAULT_MAX_CONCURRENCY);
        assert!(!cli.json);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "site-crawler",
            "https://example.test/",
            "--max-depth",
            "4",
            "--interval-ms",
            "0",
            "--concurrency",
            "2",
            "--timeout-secs",
            "3",
            "--json",
        ])
        .unwrap();
        let config = cli.crawl_config();
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.min_interval, Duration::ZERO);
        assert_eq!(config.max_concurrency, 2);
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert!(cli.json);
    }

    #[test]
    fn test_seed_is_required() {
        assert!(Cli::try_parse_from(["site-crawler"]).is_err());
    }
}
