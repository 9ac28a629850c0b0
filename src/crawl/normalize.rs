// src/crawl/normalize.rs
// =============================================================================
// URL normalization and same-domain filtering.
//
// Every href found on a page goes through Scope::normalize before it can
// become a crawl task:
// 1. Resolve it against the page it was found on (not the seed)
// 2. Reject anything that is not http/https on the seed's host
// 3. Strip the fragment, so "/b" and "/b#top" are the same page
//
// The normalized string is the dedup key, so two links that normalize to the
// same string are visited at most once.
//
// Pure functions only: no network, no shared state.
//
// Rust concepts:
// - Result<Url, LinkRejection>: a rejected link is a value, not a panic;
//   the coordinator logs it and moves on
// - map_err: converts url::ParseError into our own error type
// =============================================================================

use crate::error::{CrawlError, LinkRejection};
use url::Url;

/// The base domain of a crawl: host plus explicit port of the seed
///
/// A port equal to the scheme's default is implicit (None), so
/// http://example.test/ and https://example.test/ share a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    host: String,
    port: Option<u16>,
}

impl Scope {
    /// Parses the seed and derives the base domain from it
    ///
    /// Returns the normalized seed alongside the scope. This is the only
    /// fatal validation of a crawl.
    pub fn from_seed(seed: &str) -> Result<(Self, Url), CrawlError> {
        let mut url = Url::parse(seed).map_err(|source| CrawlError::InvalidSeed {
            url: seed.to_string(),
            source,
        })?;

        if !is_crawlable_scheme(&url) {
            return Err(CrawlError::UnsupportedSeedScheme {
                url: seed.to_string(),
                scheme: url.scheme().to_string(),
            });
        }

        let host = url
            .host_str()
            .ok_or_else(|| CrawlError::SeedWithoutHost(seed.to_string()))?
            .to_string();

        url.set_fragment(None);

        let scope = Self {
            host,
            port: url.port(),
        };
        Ok((scope, url))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Turns a raw href found on `page` into a normalized, in-scope URL
    ///
    /// Examples (seed https://example.test/):
    ///   page = https://example.test/docs/intro
    ///   "guide"                   -> https://example.test/docs/guide
    ///   "/b#frag"                 -> https://example.test/b
    ///   "https://other.test/x"    -> OutOfScope
    ///   "mailto:me@example.test"  -> OutOfScope
    ///   "http://[::1"             -> InvalidUrl
    pub fn normalize(&self, href: &str, page: &Url) -> Result<Url, LinkRejection> {
        // join() handles both cases: an absolute href replaces the base,
        // a relative one is resolved against it
        let mut resolved = page.join(href).map_err(|e| LinkRejection::InvalidUrl {
            href: href.to_string(),
            reason: e.to_string(),
        })?;

        if !self.contains(&resolved) {
            return Err(LinkRejection::OutOfScope(resolved.to_string()));
        }

        resolved.set_fragment(None);
        Ok(resolved)
    }

    /// True for http/https URLs on the base domain
    ///
    /// Also used by the HTTP client to refuse redirects that leave the site.
    pub fn contains(&self, url: &Url) -> bool {
        is_crawlable_scheme(url)
            && url.host_str() == Some(self.host.as_str())
            && url.port() == self.port
    }
}

fn is_crawlable_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
