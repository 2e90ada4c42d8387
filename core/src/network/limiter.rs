use std::sync::Arc;

use bannr_common::error::ScanError;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Counting permit pool gating how many probes may be in flight at once.
///
/// Built once per scan and handed to every probe. Clones share the same pool.
#[derive(Clone, Debug)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl ConcurrencyLimiter {
    pub fn new(capacity: usize) -> Result<Self, ScanError> {
        if capacity == 0 || capacity > Semaphore::MAX_PERMITS {
            return Err(ScanError::InvalidConcurrency {
                requested: capacity,
                max: Semaphore::MAX_PERMITS,
            });
        }

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        })
    }

    /// Suspends until a permit is free. The permit goes back to the pool when dropped.
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, ScanError> {
        Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| ScanError::LimiterClosed)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of permits currently held.
    pub fn in_use(&self) -> usize {
        self.capacity - self.semaphore.available_permits()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
