//! Bound on files open for writing
//!
//! Workers writing mirrored files take a permit first; the permit is returned
//! when it is dropped, whether the write succeeded or not.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Limits the number of concurrently open file handles
#[derive(Debug, Clone)]
pub struct HandleGate {
    semaphore: Arc<Semaphore>,
    max_open: usize,
}

/// An admitted file handle slot, released on drop
#[derive(Debug)]
pub struct HandlePermit {
    _permit: OwnedSemaphorePermit,
}

impl HandleGate {
    pub fn new(max_open: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_open)),
            max_open,
        }
    }

    /// Suspends until a handle slot is free
    ///
    /// The semaphore is never closed, so acquisition only fails if that
    /// invariant is broken; in that case the caller proceeds without a slot
    /// rather than stalling the crawl.
    pub async fn acquire(&self) -> Option<HandlePermit> {
        match Arc::clone(&self.semaphore).acquire_owned().await {
            Ok(permit) => Some(HandlePermit { _permit: permit }),
            Err(_) => {
                tracing::error!("Handle gate semaphore closed");
                None
            }
        }
    }

    /// Number of handles currently admitted
    pub fn open_handles(&self) -> usize {
        self.max_open - self.semaphore.available_permits()
    }

    pub fn max_open(&self) -> usize {
        self.max_open
    }
}
