// Bounded chronological sample history
use super::sample::Sample;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 40;

/// Most recent samples, oldest first. Appending past capacity evicts from the front.
#[derive(Debug, Clone)]
pub struct History {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn append(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Append a copy of the latest sample with its channel values rewritten by `mutate`.
    ///
    /// The copy is stamped `at`; earlier entries are never touched. Returns the
    /// appended sample, or `None` when there is nothing to copy.
    pub fn force_event<F>(&mut self, at: DateTime<Utc>, mutate: F) -> Option<Sample>
    where
        F: FnOnce(&Sample) -> Sample,
    {
        let last = self.latest()?;
        let mut forced = mutate(last);
        forced.timestamp = at;
        self.append(forced);
        Some(forced)
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
