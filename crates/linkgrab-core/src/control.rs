//! Cooperative cancellation shared between the driver and the workers.
//!
//! The driver keeps one clone of the token and calls [`CancelToken::cancel`]
//! (e.g. on Ctrl-C); workers check it at partition entry, before each item
//! and from the curl progress callback of an in-flight transfer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
