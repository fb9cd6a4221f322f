//! Bounded sample window with an incremental mean.
//!
//! # Design Decisions
//! - Fixed capacity chosen at construction; the oldest sample is evicted
//!   before the new one is accounted for
//! - The running sum lives under the same lock as the samples, so the
//!   evict/insert/sum triple is observed as one step

use std::collections::VecDeque;

use parking_lot::Mutex;

/// Fixed-capacity FIFO of numeric samples.
#[derive(Debug)]
pub struct BoundedStatsWindow {
    capacity: usize,
    inner: Mutex<WindowState>,
}

#[derive(Debug, Default)]
struct WindowState {
    samples: VecDeque<f64>,
    sum: f64,
}

impl BoundedStatsWindow {
    /// Create an empty window holding at most `capacity` samples.
    ///
    /// A capacity of zero is bumped to one so `add` always retains the
    /// latest sample.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            inner: Mutex::new(WindowState {
                samples: VecDeque::with_capacity(capacity),
                sum: 0.0,
            }),
        }
    }

    /// Insert a sample, evicting the oldest one when full.
    pub fn add(&self, sample: f64) {
        let mut state = self.inner.lock();
        if state.samples.len() == self.capacity {
            if let Some(evicted) = state.samples.pop_front() {
                state.sum -= evicted;
            }
        }
        state.samples.push_back(sample);
        state.sum += sample;
    }

    /// Arithmetic mean of the current contents, or 0 when empty.
    pub fn mean(&self) -> f64 {
        let state = self.inner.lock();
        if state.samples.is_empty() {
            0.0
        } else {
            state.sum / state.samples.len() as f64
        }
    }

    pub fn size(&self) -> usize {
        self.inner.lock().samples.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }
}
