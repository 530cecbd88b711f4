use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic request counter shared between a scheduler and its jobs.
#[derive(Debug, Clone, Default)]
pub struct GenerationCounter {
    latest: Arc<AtomicU64>,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation. Every token handed out before is cancelled
    /// from now on.
    pub fn advance(&self) -> CancelToken {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        CancelToken {
            generation,
            latest: Arc::clone(&self.latest),
        }
    }

    pub fn current(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }
}

/// Handed to a background job; reports cancellation once a newer
/// generation has started.
#[derive(Debug, Clone)]
pub struct CancelToken {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl CancelToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.latest.load(Ordering::Acquire) != self.generation
    }
}
