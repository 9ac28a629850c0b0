// src/fetch/mod.rs
// =============================================================================
// The fetch-and-extract pipeline: everything that happens to one page.
//
//   pacing gate -> HTTP GET -> parse -> walk the tree for <a href>
//
// Submodules:
// - pacing: crawl-wide minimum interval between fetches
// - http: the HTTP client capability (trait + reqwest implementation)
// - html: href extraction from the parsed document
//
// One network request per call, no shared state touched besides the gate.
//
// Rust concepts:
// - tokio::select!: waits on the gate and the cancellation token at once
//   and takes whichever finishes first
// - ? with #[from]: FetchError and ParseError convert into PageError
// =============================================================================

mod html;
mod http;
mod pacing;

pub use html::extract_hrefs;
pub use http::{HttpFetcher, PageFetcher};
pub use pacing::RateLimiter;

use crate::error::PageError;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Fetches `url` and returns the raw href values found on it
///
/// Waiting on the gate is the only suspension before network I/O. If the
/// crawl is cancelled while waiting, no request is sent. A fetch failure
/// skips extraction entirely.
pub async fn fetch_and_extract(
    fetcher: &dyn PageFetcher,
    limiter: &RateLimiter,
    cancel: &CancellationToken,
    url: &Url,
) -> Result<Vec<String>, PageError> {
    tokio::select! {
        biased;

        _ = cancel.cancelled() => return Err(PageError::Cancelled),
        _ = limiter.acquire() => {}
    }

    let body = fetcher.fetch(url).await?;
    let hrefs = extract_hrefs(&body)?;
    Ok(hrefs)
}
