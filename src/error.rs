// src/error.rs
// =============================================================================
// Error types for the crawler.
//
// Only CrawlError is fatal (it aborts before any task is spawned). Everything
// else is scoped to a single link or a single page and never stops the crawl:
// - LinkRejection: a raw href that is dropped silently
// - FetchError / ParseError: a page that is reported but not expanded
// =============================================================================

use thiserror::Error;

/// Errors that abort the crawl before it starts
#[derive(Error, Debug)]
pub enum CrawlError {
    /// The seed could not be parsed as an absolute URL
    #[error("Invalid seed URL '{url}': {source}")]
    InvalidSeed {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The seed is not an http/https URL
    #[error("Unsupported seed URL scheme '{scheme}' in '{url}' (expected http or https)")]
    UnsupportedSeedScheme { url: String, scheme: String },

    /// The seed parsed but has no host to confine the crawl to
    #[error("Seed URL has no host: {0}")]
    SeedWithoutHost(String),
}

/// Why a discovered link did not become a crawl task
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkRejection {
    /// The href could not be parsed or resolved
    #[error("Invalid URL '{href}': {reason}")]
    InvalidUrl { href: String, reason: String },

    /// The resolved link points away from the base domain
    #[error("Out of scope: {0}")]
    OutOfScope(String),
}

/// Errors from the HTTP client capability
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Could not resolve hostname
    #[error("Could not resolve hostname")]
    Dns,

    /// SSL/TLS certificate error
    #[error("SSL certificate error")]
    Tls,

    /// Connection could not be established
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Redirect loop or redirect limit reached
    #[error("Too many redirects")]
    TooManyRedirects,

    /// Server redirected to a URL outside the crawled site
    #[error("Redirect leaves the site: {0}")]
    OffSiteRedirect(String),

    /// Server answered with a non-success status
    #[error("HTTP {0}")]
    Status(u16),

    /// Any other transport failure (including reading the body)
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Errors from turning a response body into a document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Body is not valid UTF-8 text
    #[error("Body is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },
}

/// Per-page failure of the fetch-and-extract pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// The crawl was cancelled while this page waited for its turn
    #[error("Cancelled before fetch")]
    Cancelled,
}
