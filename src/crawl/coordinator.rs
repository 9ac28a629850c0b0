// src/crawl/coordinator.rs
// =============================================================================
// The crawl coordinator: turns discovered links into concurrent crawl tasks
// and decides when the crawl is over.
//
// How it works:
// 1. The seed is registered as pending work and queued at depth 0
// 2. The dispatch loop pulls tasks off the queue, waits for a free slot
//    (at most max_concurrency tasks run at once) and spawns them
// 3. Each task: Checking -> {Skipped | Active} -> Expanding -> Done
//    - Checking: cancelled? deeper than max_depth? already visited?
//    - Active: fetch and extract (one bad page never aborts the crawl)
//    - Expanding: normalize every href, queue each new in-scope link at
//      depth + 1, registering it before it is queued
//    - Done: the task's pending guard drops
// 4. The loop ends when the pending-work counter drains to zero
//
// Politeness:
// - Every fetch passes through one shared RateLimiter
// - Only links on the seed's host are ever queued
//
// Rust concepts:
// - Arc<CrawlContext>: every spawned task shares the same context; Arc is a
//   thread-safe reference counter, so the context lives until the last
//   task is done with it
// - JoinSet: a set of spawned tasks we can await one by one
// - Semaphore: hands out a fixed number of permits; a task keeps its
//   permit until it finishes, which caps how many run at once
// - mpsc channel: the frontier; tasks push discoveries, the loop pulls them
// =============================================================================

use super::normalize::Scope;
use super::pending::{PendingGuard, PendingWork};
use super::report::{CrawlReport, PageOutcome, PageRecord};
use super::visited::VisitedSet;
use crate::config::CrawlConfig;
use crate::error::{CrawlError, PageError};
use crate::fetch::{fetch_and_extract, PageFetcher, RateLimiter};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use url::Url;

/// Visit this URL at this depth
#[derive(Debug)]
pub struct CrawlTask {
    pub url: Url,
    pub depth: usize,
}

// A task travelling through the queue, still counted as pending
struct Queued {
    task: CrawlTask,
    registration: PendingGuard,
}

// State shared by every running task
struct CrawlContext {
    scope: Scope,
    max_depth: usize,
    visited: VisitedSet,
    limiter: RateLimiter,
    fetcher: Arc<dyn PageFetcher>,
    pending: Arc<PendingWork>,
    queue: mpsc::UnboundedSender<Queued>,
    cancel: CancellationToken,
}

pub struct Crawler {
    config: CrawlConfig,
    fetcher: Arc<dyn PageFetcher>,
}

impl Crawler {
    pub fn new(config: CrawlConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { config, fetcher }
    }

    /// Crawls from the configured seed until no work is left
    ///
    /// Only an invalid seed is an error; page failures end up in the report.
    /// Cancelling `cancel` stops new tasks from starting, drops the ones still
    /// waiting for the rate limiter and lets the ones already fetching finish.
    pub async fn run(&self, cancel: CancellationToken) -> Result<CrawlReport, CrawlError> {
        let (scope, seed) = Scope::from_seed(&self.config.seed)?;
        info!(
            seed = %seed,
            host = scope.host(),
            max_depth = self.config.max_depth,
            "starting crawl"
        );

        let (queue, mut frontier) = mpsc::unbounded_channel();
        let ctx = Arc::new(CrawlContext {
            scope,
            max_depth: self.config.max_depth,
            visited: VisitedSet::new(),
            limiter: RateLimiter::new(self.config.min_interval),
            fetcher: Arc::clone(&self.fetcher),
            pending: PendingWork::new(),
            queue,
            cancel,
        });
        ctx.enqueue(CrawlTask {
            url: seed.clone(),
            depth: 0,
        });

        let slots = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let mut running = JoinSet::new();
        let mut pages = Vec::new();

        loop {
            tokio::select! {
                biased;

                Some(joined) = running.join_next(), if !running.is_empty() => {
                    collect(joined, &mut pages);
                }
                Some(queued) = frontier.recv() => {
                    // The semaphore is never closed, so this only fails if
                    // that ever changes
                    let Ok(permit) = Arc::clone(&slots).acquire_owned().await else {
                        break;
                    };
                    let ctx = Arc::clone(&ctx);
                    running.spawn(async move {
                        let _permit = permit;
                        ctx.visit(queued).await
                    });
                }
                _ = ctx.pending.drained() => break,
            }
        }

        while let Some(joined) = running.join_next().await {
            collect(joined, &mut pages);
        }

        info!(
            pages = pages.len(),
            visited = ctx.visited.len(),
            "crawl finished"
        );
        Ok(CrawlReport {
            seed: seed.to_string(),
            pages,
        })
    }
}

impl CrawlContext {
    // Registration happens before the task is handed to the queue, so the
    // counter can never read zero while this task is in transit.
    fn enqueue(&self, task: CrawlTask) {
        let registration = self.pending.register();
        if self.queue.send(Queued { task, registration }).is_err() {
            debug!("frontier closed, dropping task");
        }
    }

    async fn visit(&self, queued: Queued) -> Option<PageRecord> {
        // Held until this function returns: that is the Done transition
        let Queued { task, registration: _registration } = queued;

        if self.cancel.is_cancelled() {
            debug!(url = %task.url, "crawl cancelled, skipping");
            return None;
        }
        if task.depth > self.max_depth {
            debug!(url = %task.url, depth = task.depth, "too deep, skipping");
            return None;
        }
        if !self.visited.test_and_mark(task.url.as_str()) {
            debug!(url = %task.url, "already visited, skipping");
            return None;
        }

        info!(depth = task.depth, url = %task.url, "crawling");

        let fetched =
            fetch_and_extract(&*self.fetcher, &self.limiter, &self.cancel, &task.url).await;
        let outcome = match fetched {
            Ok(hrefs) => {
                let links_followed = self.expand(&task, &hrefs);
                PageOutcome::Success {
                    links_found: hrefs.len(),
                    links_followed,
                }
            }
            Err(PageError::Fetch(e)) => {
                warn!(url = %task.url, error = %e, "failed to fetch page");
                PageOutcome::FetchError {
                    message: e.to_string(),
                }
            }
            Err(PageError::Parse(e)) => {
                warn!(url = %task.url, error = %e, "failed to parse page");
                PageOutcome::ParseError {
                    message: e.to_string(),
                }
            }
            // Claimed but never requested: no record
            Err(PageError::Cancelled) => {
                debug!(url = %task.url, "crawl cancelled while waiting to fetch");
                return None;
            }
        };

        Some(PageRecord {
            depth: task.depth,
            url: task.url.to_string(),
            outcome,
        })
    }

    // Queues every distinct in-scope link as a child task; returns how many
    fn expand(&self, parent: &CrawlTask, hrefs: &[String]) -> usize {
        let depth = parent.depth + 1;
        if depth > self.max_depth || self.cancel.is_cancelled() {
            return 0;
        }

        let mut seen = HashSet::new();
        for href in hrefs {
            match self.scope.normalize(href, &parent.url) {
                Ok(url) => {
                    if seen.insert(url.clone()) {
                        self.enqueue(CrawlTask { url, depth });
                    }
                }
                Err(rejection) => debug!(page = %parent.url, %rejection, "dropping link"),
            }
        }
        seen.len()
    }
}

fn collect(joined: Result<Option<PageRecord>, JoinError>, pages: &mut Vec<PageRecord>) {
    match joined {
        Ok(Some(page)) => pages.push(page),
        Ok(None) => {}
        Err(e) => error!(error = %e, "crawl task panicked"),
    }
}
