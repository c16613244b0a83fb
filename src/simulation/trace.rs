//! Capped (depth, weight) trace for chart overlay

use std::collections::VecDeque;

use crate::types::TraceSample;

/// FIFO buffer of trace samples; the oldest sample is evicted once the
/// capacity is exceeded.
#[derive(Debug, Clone)]
pub struct TraceBuffer {
    samples: VecDeque<TraceSample>,
    capacity: usize,
}

impl TraceBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: TraceSample) {
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&TraceSample> {
        self.samples.back()
    }

    /// Samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TraceSample> {
        self.samples.iter()
    }

    pub fn to_vec(&self) -> Vec<TraceSample> {
        self.samples.iter().copied().collect()
    }
}
