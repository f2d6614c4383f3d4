//! Shared sequence counter for per-item log lines.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Hands out 1-based sequence numbers across all workers of one download
/// run. Only used for logging; it has no effect on scheduling.
#[derive(Debug, Default)]
pub struct ProgressCounter {
    next: AtomicUsize,
}

impl ProgressCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next sequence number (1, 2, 3, ...).
    pub fn next(&self) -> usize {
        self.next.fetch_add(1, Ordering::Relaxed) + 1
    }
}
