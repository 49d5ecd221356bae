//! Bounded FIFO of recent samples with a running mean.
//!
//! ```text
//! capacity 3, put 1..=5:
//!
//!   put 1  [1]
//!   put 2  [1 2]
//!   put 3  [1 2 3]      full
//!   put 4  [2 3 4]      1 evicted
//!   put 5  [3 4 5]      2 evicted
//! ```
//!
//! Overflow is not an error: `put` on a full buffer silently drops the
//! oldest entry first.

use std::collections::VecDeque;

use crate::error::TelemetryError;
use crate::sample::Sample;

/// Fixed-capacity, oldest-first history of samples of one kind.
#[derive(Debug, Clone)]
pub struct BoundedHistoryBuffer<S: Sample> {
    entries: VecDeque<S>,
    capacity: usize,
}

impl<S: Sample> BoundedHistoryBuffer<S> {
    /// A buffer holding at most `capacity` samples.
    ///
    /// A capacity of zero is never full and therefore never evicts; the
    /// [`Sensor`](crate::app::sensor::Sensor) never builds one, it keeps
    /// no buffer at all instead.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append `sample`, evicting the oldest entry first when full.
    pub fn put(&mut self, sample: S) {
        if self.is_full() {
            self.entries.pop_front();
        }
        self.entries.push_back(sample);
    }

    /// Remove and return the oldest entry.
    pub fn get(&mut self) -> Result<S, TelemetryError> {
        self.entries.pop_front().ok_or(TelemetryError::EmptyBuffer)
    }

    /// Mean of all current entries in this buffer's sample kind.
    pub fn average(&self) -> Result<S, TelemetryError> {
        S::mean(self.entries.iter().copied()).ok_or(TelemetryError::EmptyBuffer)
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.entries.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries oldest-first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = S> + '_ {
        self.entries.iter().copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
