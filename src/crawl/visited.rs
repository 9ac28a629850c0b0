// src/crawl/visited.rs
// =============================================================================
// The deduplication store: every normalized URL the crawl has claimed.
//
// The only mutating operation is test_and_mark, which checks membership and
// inserts under one lock, so two tasks racing on the same URL can never both
// see "not visited". The set only grows; there is no removal.
//
// Rust concepts:
// - std::sync::Mutex (not tokio's): the lock is never held across an
//   .await, so the blocking mutex is fine and cheaper
// =============================================================================

use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `url` was not yet recorded and is now recorded
    ///
    /// A false return means another task already owns this URL; the caller
    /// must not fetch or expand it.
    pub fn test_and_mark(&self, url: &str) -> bool {
        // A poisoned lock only means another task panicked mid-insert;
        // the set itself is still consistent.
        let mut urls = self
            .urls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if urls.contains(url) {
            return false;
        }
        urls.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.urls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_first_mark_wins() {
        let visited = VisitedSet::new();
        assert!(visited.test_and_mark("https://example.test/"));
        assert!(!visited.test_and_mark("https://example.test/"));
        assert!(visited.test_and_mark("https://example.test/a"));
        assert_eq!(visited.len(), 2);
    }

    #[test]
    fn test_concurrent_marks_admit_exactly_one() {
        let visited = VisitedSet::new();
        let winners = AtomicUsize::new(0);

        std::thread::scope(|s| {
            for _ in 0..16 {
                s.spawn(|| {
                    if visited.test_and_mark("https://example.test/contended") {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(winners.load(Ordering::SeqCst), 1);
        assert_eq!(visited.len(), 1);
    }
}
