// src/crawl/report.rs
// =============================================================================
// What a crawl produces: one record per visited page.
//
// Skipped tasks (too deep, already visited, cancelled) leave no record; a
// page shows up here exactly when it was claimed and fetched.
// =============================================================================

use serde::Serialize;

/// How fetching and expanding one page went
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PageOutcome {
    /// Page fetched and parsed
    Success {
        /// Raw anchors on the page, duplicates and rejects included
        links_found: usize,
        /// Distinct in-scope links queued as child tasks
        links_followed: usize,
    },
    /// Transport failure or non-success status
    FetchError { message: String },
    /// Body could not be turned into a document
    ParseError { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    pub depth: usize,
    pub url: String,
    #[serde(flatten)]
    pub outcome: PageOutcome,
}

impl PageRecord {
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, PageOutcome::Success { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    /// The normalized seed URL
    pub seed: String,
    /// Visited pages in completion order
    pub pages: Vec<PageRecord>,
}

impl CrawlReport {
    /// Visited URLs, sorted
    #[cfg(test)]
    pub fn visited(&self) -> Vec<&str> {
        let mut urls: Vec<&str> = self.pages.iter().map(|p| p.url.as_str()).collect();
        urls.sort_unstable();
        urls
    }

    pub fn failed_count(&self) -> usize {
        self.pages.iter().filter(|p| !p.is_ok()).count()
    }

    /// Pages ordered by depth, then URL, for display
    pub fn sorted_pages(&self) -> Vec<&PageRecord> {
        let mut pages: Vec<&PageRecord> = self.pages.iter().collect();
        pages.sort_by(|a, b| (a.depth, &a.url).cmp(&(b.depth, &b.url)));
        pages
    }
}
