//! Identifier generation for new records
//!
//! Writes mint the document id client-side, behind the `IdGen` seam:
//!
//! - `UuidGen` (default): UUIDv4 ids, collision-safe across process
//!   restarts and multiple instances.
//! - `SequenceCounter`: mutex-guarded monotonic integer, matching the
//!   original single-process deployment. Safe under concurrent callers
//!   (no duplicates, no lost increments) but resets on restart, so it is
//!   only appropriate when one process owns the collection.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source of fresh record identifiers.
pub trait IdGen: Send + Sync {
    /// Returns an id never previously returned by this generator.
    fn next_id(&self) -> String;
}

/// Which `IdGen` implementation a deployment uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// UUIDv4 ids (globally unique).
    #[default]
    Uuid,
    /// Process-local monotonic counter.
    Sequence,
}

impl IdStrategy {
    /// Build the generator for this strategy.
    pub fn build(self) -> Arc<dyn IdGen> {
        match self {
            IdStrategy::Uuid => Arc::new(UuidGen),
            IdStrategy::Sequence => Arc::new(SequenceCounter::new()),
        }
    }
}

/// UUIDv4 id generator.
pub struct UuidGen;

impl IdGen for UuidGen {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Strictly increasing per-process counter.
///
/// The read-increment-return sequence holds the lock for its whole
/// duration, so concurrent callers can never observe the same value.
pub struct SequenceCounter {
    count: Mutex<u64>,
}

impl SequenceCounter {
    /// Starts at zero; the first id handed out is "1".
    pub fn new() -> Self {
        Self {
            count: Mutex::new(0),
        }
    }
}

impl Default for SequenceCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGen for SequenceCounter {
    fn next_id(&self) -> String {
        let mut count = self
            .count
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *count += 1;
        count.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn sequence_counter_is_monotonic() {
        let counter = SequenceCounter::new();
        assert_eq!(counter.next_id(), "1");
        assert_eq!(counter.next_id(), "2");
        assert_eq!(counter.next_id(), "3");
    }

    #[test]
    fn sequence_counter_concurrent_callers_get_distinct_ids() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 200;

        let counter = Arc::new(SequenceCounter::new());
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    (0..PER_THREAD)
                        .map(|_| counter.next_id())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().expect("counter thread panicked") {
                assert!(seen.insert(id), "duplicate id handed out");
            }
        }
        assert_eq!(seen.len(), THREADS * PER_THREAD);
    }

    #[test]
    fn uuid_gen_yields_distinct_nonempty_ids() {
        let ids = UuidGen;
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(!a.is_empty());
        assert_ne!(a, b);
    }

    #[test]
    fn strategy_builds_matching_generator() {
        let seq = IdStrategy::Sequence.build();
        assert_eq!(seq.next_id(), "1");

        let uuid = IdStrategy::Uuid.build();
        assert_eq!(uuid.next_id().len(), 36);
    }
}
