use crate::core::CalculationRecord;
use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 5;

/// Newest-first history of calculations, bounded at `capacity`.
///
/// `append` is a pure transformation: it returns the next state and leaves
/// `self` untouched, so callers can swap states atomically.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryLedger {
    records: VecDeque<CalculationRecord>,
    capacity: usize,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A zero capacity is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn append(&self, record: CalculationRecord) -> HistoryLedger {
        let mut next = self.clone();
        next.records.push_front(record);
        next.records.truncate(next.capacity);
        next
    }

    pub fn current(&self) -> Vec<CalculationRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::new()
    }
}
