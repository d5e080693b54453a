// Sliding window buffer for the most recent accepted samples
//
// Fixed capacity, insertion-ordered, strict FIFO eviction: when a push would
// exceed capacity, exactly one sample is evicted from the front. Readers get
// copy-on-read snapshots, so a later push never alters a view already handed
// out.

use crate::types::{Sample, StreamError, StreamResult};
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::Arc;

/// Default window capacity when none is configured
pub const DEFAULT_WINDOW_CAPACITY: usize = 200;

/// Fixed-capacity FIFO window over the accepted sample stream
///
/// Cloning is cheap and shares the underlying storage; the drain task is the
/// single writer, any number of renderers read snapshots.
#[derive(Clone)]
pub struct SlidingWindow {
    samples: Arc<RwLock<VecDeque<Sample>>>,
    capacity: usize,
}

impl SlidingWindow {
    /// Create an empty window holding at most `capacity` samples
    ///
    /// Capacity is fixed for the window's lifetime; zero is a configuration
    /// error.
    pub fn new(capacity: usize) -> StreamResult<Self> {
        if capacity < 1 {
            return Err(StreamError::InvalidConfig(
                "window capacity must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            samples: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity,
        })
    }

    /// Append the newest sample, evicting the oldest if the window is full
    pub fn push(&self, sample: Sample) {
        let mut samples = self.samples.write();
        samples.push_back(sample);
        if samples.len() > self.capacity {
            samples.pop_front();
        }
    }

    /// Current contents, oldest to newest
    ///
    /// The returned vector is an independent copy; later pushes do not touch
    /// it.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.read().iter().copied().collect()
    }

    /// Most recently accepted sample, if any
    pub fn latest(&self) -> Option<Sample> {
        self.samples.read().back().copied()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.read().is_empty()
    }
}
