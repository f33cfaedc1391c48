//! Monotonic sequence numbers
//!
//! Failures and trace events are stamped with a process-wide sequence number
//! so that reports can be ordered deterministically even when they are
//! collected from nested scopes. The counter is a single atomic and is safe
//! under arbitrary concurrent callers.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A single stamp handed out by a [`SequenceCounter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SequenceNumber(u64);

impl SequenceNumber {
    /// Get the raw value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Thread-safe monotonically increasing counter
#[derive(Debug, Default)]
pub struct SequenceCounter {
    next: AtomicU64,
}

impl SequenceCounter {
    /// Create a counter starting at zero
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// Hand out the next number; never returns the same value twice
    pub fn increment(&self) -> SequenceNumber {
        SequenceNumber(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Peek at the value the next call to `increment` will return
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

static GLOBAL_SEQUENCE: SequenceCounter = SequenceCounter::new();

/// Draw the next number from the process-wide counter
pub fn next_sequence() -> SequenceNumber {
    GLOBAL_SEQUENCE.increment()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_counter_is_monotonic() {
        let counter = SequenceCounter::new();
        let a = counter.increment();
        let b = counter.increment();
        assert!(b > a);
        assert_eq!(counter.peek(), 2);
    }

    #[test]
    fn test_global_sequence_increases() {
        let a = next_sequence();
        let b = next_sequence();
        assert!(b > a);
    }

    #[test]
    fn test_concurrent_increments_are_unique() {
        let counter = Arc::new(SequenceCounter::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = counter.clone();
                std::thread::spawn(move || {
                    (0..1000).map(|_| counter.increment()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for number in handle.join().unwrap() {
                assert!(seen.insert(number), "duplicate sequence number {}", number);
            }
        }
        assert_eq!(seen.len(), 8000);
    }

    #[test]
    fn test_serialization() {
        let n = SequenceCounter::new().increment();
        let json = serde_json::to_string(&n).unwrap();
        let back: SequenceNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(n, back);
    }
}
