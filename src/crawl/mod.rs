// src/crawl/mod.rs
// =============================================================================
// This module handles crawling a single website.
//
// Features:
// - Concurrent crawling from a seed URL, capped number of tasks in flight
// - Same-domain restriction (never leaves the seed's host)
// - Configurable depth limit
// - Each normalized URL is fetched at most once
// - Cooperative cancellation
//
// Submodules:
// - normalize: resolve, scope-check and de-fragment discovered links
// - visited: the shared "already claimed" set
// - pending: counts outstanding tasks to detect when the crawl is done
// - coordinator: spawns tasks and runs them through their lifecycle
// - report: per-page results
// =============================================================================

mod coordinator;
mod normalize;
mod pending;
mod report;
mod visited;

pub use coordinator::Crawler;
pub use normalize::Scope;
pub use report::{CrawlReport, PageOutcome};
