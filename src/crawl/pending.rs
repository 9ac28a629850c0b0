// src/crawl/pending.rs
// =============================================================================
// The pending-work counter: how many crawl tasks are registered but not done.
//
// register() increments and hands back a guard; dropping the guard is the
// matching decrement. A task's guard travels with it through the queue and
// lives until the task has finished expanding, and children are registered
// while their parent still holds its own guard. So the count can only reach
// zero once the whole reachable graph has drained.
//
// Rust concepts:
// - RAII: the decrement lives in Drop, so a panicking task still releases
//   its registration and the crawl cannot hang on it
// - Notify: wakes whoever is waiting in drained() when the count hits zero
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
pub struct PendingWork {
    count: AtomicUsize,
    zero: Notify,
}

impl PendingWork {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers one unit of work; it stays pending until the guard drops
    pub fn register(self: &Arc<Self>) -> PendingGuard {
        self.count.fetch_add(1, Ordering::SeqCst);
        PendingGuard {
            work: Arc::clone(self),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Resolves once no registered work remains
    pub async fn drained(&self) {
        loop {
            // Create the waiter before reading the count so a decrement
            // landing in between still wakes us.
            let notified = self.zero.notified();
            if self.in_flight() == 0 {
                return;
            }
            notified.await;
        }
    }

    fn complete(&self) {
        if self.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.zero.notify_waiters();
        }
    }
}

/// Proof of one registered unit of pending work
#[derive(Debug)]
pub struct PendingGuard {
    work: Arc<PendingWork>,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.work.complete();
    }
}
