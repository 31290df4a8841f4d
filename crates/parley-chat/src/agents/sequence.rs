use std::collections::{HashSet, VecDeque};

/// Default number of sequence numbers remembered per request
pub const DEFAULT_CAPACITY: usize = 4096;

/// Remembers recently seen sequence numbers
///
/// Bounded: once full, the oldest number is forgotten first.
#[derive(Debug)]
pub struct SequenceTracker {
    seen: HashSet<u64>,
    order: VecDeque<u64>,
    capacity: usize,
}

impl SequenceTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            seen: HashSet::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            order: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity: capacity.max(1),
        }
    }

    /// `true` the first time `sequence` is observed
    pub fn observe(&mut self, sequence: u64) -> bool {
        if !self.seen.insert(sequence) {
            return false;
        }

        self.order.push_back(sequence);
        if self.order.len() > self.capacity
            && let Some(oldest) = self.order.pop_front()
        {
            self.seen.remove(&oldest);
        }

        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for SequenceTracker {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
