//! Per universe sequence numbers, as per ANSI E1.31-2018 Section 6.7.2.
//!
//! Every universe counts on its own, starting at [STARTING_SEQUENCE_NUMBER] and wrapping after 255. Counters are
//! created on the first packet for a universe and live as long as the table.

use std::{
    collections::HashMap,
    sync::{
        PoisonError, RwLock,
        atomic::{AtomicU8, Ordering},
    },
};

use crate::{e131_definitions::STARTING_SEQUENCE_NUMBER, universe_id::UniverseId};

/// Maps universes to their sequence counters.
///
/// Taking a number is a single atomic fetch-and-add on the universe's own counter. The map lock is only held for
/// writing when a universe is seen for the first time, so universes never wait on each other in the steady state.
#[derive(Debug, Default)]
pub struct SequenceTable {
    counters: RwLock<HashMap<UniverseId, AtomicU8>>,
}

impl SequenceTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the sequence number for the next packet on `universe` and advances the counter, wrapping after 255.
    ///
    /// Concurrent callers on the same universe always receive distinct numbers (modulo 256).
    pub fn next(&self, universe: UniverseId) -> u8 {
        {
            // The counters are plain atomics, a panic elsewhere can't leave them half written.
            let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(counter) = counters.get(&universe) {
                return counter.fetch_add(1, Ordering::Relaxed);
            }
        }

        let mut counters = self.counters.write().unwrap_or_else(PoisonError::into_inner);
        counters
            .entry(universe)
            .or_insert_with(|| AtomicU8::new(STARTING_SEQUENCE_NUMBER))
            .fetch_add(1, Ordering::Relaxed)
    }

    /// The number [Self::next] would hand out for `universe`, without advancing.
    pub fn peek(&self, universe: UniverseId) -> u8 {
        let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
        counters
            .get(&universe)
            .map_or(STARTING_SEQUENCE_NUMBER, |counter| counter.load(Ordering::Relaxed))
    }

    /// Number of universes that have been sent on.
    pub fn universe_count(&self) -> usize {
        self.counters.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod test {
    use std::{collections::HashSet, sync::Mutex, thread};

    use super::*;

    fn universe(raw: u16) -> UniverseId {
        UniverseId::new(raw).unwrap()
    }

    #[test]
    fn test_first_number_is_zero() {
        let table = SequenceTable::new();

        assert_eq!(table.peek(universe(1)), 0);
        assert_eq!(table.universe_count(), 0);
        assert_eq!(table.next(universe(1)), 0);
        assert_eq!(table.peek(universe(1)), 1);
        assert_eq!(table.universe_count(), 1);
    }

    #[test]
    fn test_wraps_after_255() {
        let table = SequenceTable::new();

        for expected in (0..=255u8).chain(0..=10) {
            assert_eq!(table.next(universe(9)), expected);
        }
    }

    #[test]
    fn test_universes_count_independently() {
        let table = SequenceTable::new();

        for _ in 0..5 {
            table.next(universe(1));
        }
        assert_eq!(table.next(universe(2)), 0);
        assert_eq!(table.next(universe(1)), 5);
        assert_eq!(table.next(universe(2)), 1);
    }

    #[test]
    fn test_concurrent_callers_get_distinct_numbers() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 32;

        let table = SequenceTable::new();
        let seen = Mutex::new(Vec::new());

        thread::scope(|s| {
            for _ in 0..THREADS {
                s.spawn(|| {
                    let mine: Vec<u8> = (0..PER_THREAD).map(|_| table.next(universe(77))).collect();
                    seen.lock().unwrap().extend(mine);
                });
            }
        });

        let seen = seen.into_inner().unwrap();
        let unique: HashSet<u8> = seen.iter().copied().collect();
        assert_eq!(seen.len(), THREADS * PER_THREAD);
        assert_eq!(unique.len(), THREADS * PER_THREAD);
        assert_eq!(table.peek(universe(77)), 0);
    }
}
