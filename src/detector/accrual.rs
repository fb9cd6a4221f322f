//! Per-host φ-accrual arrival model.
//!
//! φ is the time since the last arrival divided by the mean of recent
//! inter-arrival intervals, scaled by `1 / ln(10)` so that a threshold of 8
//! keeps the confidence level operators are used to tuning against.
//!
//! # Design Decisions
//! - The first arrival seeds the window with a large interval: a cold host
//!   errs towards false negatives rather than flapping false positives
//! - Samples are kept in nanoseconds
//! - Intervals longer than the seed are still recorded; a host that is
//!   regularly slow adapts rather than being clamped

use std::f64::consts::LN_10;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::detector::window::BoundedStatsWindow;

/// Normalisation applied to the raw `t / mean` ratio.
pub const PHI_FACTOR: f64 = 1.0 / LN_10;

/// Smallest mean (in nanoseconds) used as a φ denominator. Keeps φ finite
/// when every recorded interval is zero.
const MIN_MEAN_NANOS: f64 = 1.0;

/// Arrival statistics for a single host.
#[derive(Debug)]
pub struct ArrivalAccrualModel {
    intervals: BoundedStatsWindow,
    last_arrival: Mutex<Option<Instant>>,
    seed_interval: Duration,
}

impl ArrivalAccrualModel {
    pub fn new(window_size: usize, seed_interval: Duration) -> Self {
        Self {
            intervals: BoundedStatsWindow::new(window_size),
            last_arrival: Mutex::new(None),
            seed_interval,
        }
    }

    /// Record a successful observation at `now`.
    pub fn record_arrival(&self, now: Instant) {
        let mut last = self.last_arrival.lock();
        let sample = match *last {
            Some(previous) => now.saturating_duration_since(previous),
            None => self.seed_interval,
        };
        self.intervals.add(sample.as_nanos() as f64);
        *last = Some(now);
    }

    /// Suspicion level at `now`, or `None` before the first arrival.
    pub fn phi(&self, now: Instant) -> Option<f64> {
        let last = (*self.last_arrival.lock())?;
        if self.intervals.is_empty() {
            return None;
        }
        let elapsed = now.saturating_duration_since(last).as_nanos() as f64;
        let mean = self.intervals.mean().max(MIN_MEAN_NANOS);
        Some(PHI_FACTOR * elapsed / mean)
    }

    /// Time elapsed since the last arrival, if any.
    pub fn since_last_arrival(&self, now: Instant) -> Option<Duration> {
        self.last_arrival
            .lock()
            .map(|last| now.saturating_duration_since(last))
    }

    pub fn last_arrival(&self) -> Option<Instant> {
        *self.last_arrival.lock()
    }

    /// Mean inter-arrival interval; zero without data.
    pub fn mean_interval(&self) -> Duration {
        Duration::from_nanos(self.intervals.mean() as u64)
    }

    pub fn mean_interval_millis(&self) -> u64 {
        self.mean_interval().as_millis() as u64
    }

    pub fn sample_count(&self) -> usize {
        self.intervals.size()
    }
}
