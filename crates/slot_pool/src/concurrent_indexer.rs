use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crossbeam_utils::CachePadded;

use crate::{IndexHolder, Indexer};

/// Reserved cell value meaning "nothing is stored here".
const VACANT: usize = 0;

/// Lock-free allocator of slot indices.
///
/// The state is a ring of `2 * capacity` cells plus two monotonically
/// increasing cursors. A free index lives in exactly one cell between the
/// read and write cursors; a handed-out index lives nowhere. The doubled
/// ring is load-bearing: it gives releases enough head-room that a release
/// never has to wait for a reader to drain the ring first.
///
/// Cells store `index + 1` so that zero can mark a vacant cell. A vacant
/// cell under a freshly claimed cursor means the thread publishing to that
/// cell has advanced the cursor but not stored yet; both operations
/// spin-yield through that window, which only opens when the thread count
/// far exceeds the capacity.
///
/// Cursors wrap to zero at the largest multiple of the ring length they can
/// represent, via a compare-exchange that only one thread wins, so
/// `cursor % ring_len` stays aligned across overflow.
///
/// Both operations are non-blocking with respect to peers: no mutual
/// exclusion anywhere, and under contention `next()` may transiently report
/// empty rather than wait.
pub struct ConcurrentIndexer {
    read_pos: CachePadded<AtomicUsize>,
    write_pos: CachePadded<AtomicUsize>,
    cells: Box<[AtomicUsize]>,
    wrap_limit: usize,
}

impl ConcurrentIndexer {
    fn ring_len(&self) -> usize {
        self.cells.len()
    }

    /// Moves an overflowing cursor back to zero. Exactly one racing thread
    /// performs the store; the others observe the wrapped value and proceed.
    fn wrap_on_overflow(position: &AtomicUsize, limit: usize) {
        let mut current = position.load(Ordering::Acquire);

        while current == limit {
            match position.compare_exchange_weak(current, 0, Ordering::AcqRel, Ordering::Acquire) {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }
}

impl Indexer for ConcurrentIndexer {
    fn with_capacity(capacity: usize) -> Self {
        let ring_len = capacity
            .checked_mul(2)
            .expect("indexer capacity does not fit a doubled ring");

        // The first half of the ring starts out holding every index, shifted
        // by one to keep zero as the vacant marker. The second half is the
        // head-room for releases.
        let cells = (0..ring_len)
            .map(|cell| AtomicUsize::new(if cell < capacity { cell + 1 } else { VACANT }))
            .collect();

        let wrap_limit = if ring_len == 0 {
            0
        } else {
            (usize::MAX / ring_len) * ring_len
        };

        Self {
            read_pos: CachePadded::new(AtomicUsize::new(0)),
            write_pos: CachePadded::new(AtomicUsize::new(capacity)),
            cells,
            wrap_limit,
        }
    }

    fn next(&self) -> IndexHolder {
        if self.cells.is_empty() {
            return IndexHolder::empty();
        }

        loop {
            let read = self.read_pos.load(Ordering::Acquire);

            if read == self.wrap_limit {
                Self::wrap_on_overflow(&self.read_pos, self.wrap_limit);
                continue;
            }

            let write = self.write_pos.load(Ordering::Acquire);

            // Cursors level: everything is handed out.
            if read == write {
                return IndexHolder::empty();
            }

            let cell = read % self.ring_len();

            // A release can advance the write cursor before publishing its
            // value. Reporting empty here is allowed; the contract does not
            // promise wait-freedom.
            if self.cells[cell].load(Ordering::Acquire) == VACANT {
                return IndexHolder::empty();
            }

            if self
                .read_pos
                .compare_exchange_weak(read, read + 1, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                continue;
            }

            // The cursor claim won, but a wrapped-around writer may still be
            // mid-publish on this very cell. Wait for the value to land.
            let mut value = self.cells[cell].load(Ordering::Acquire);
            while value == VACANT {
                thread::yield_now();
                value = self.cells[cell].load(Ordering::Acquire);
            }

            self.cells[cell].store(VACANT, Ordering::Release);

            return IndexHolder::new(value - 1);
        }
    }

    fn release(&self, index: usize) {
        debug_assert!(
            index < self.ring_len() / 2,
            "released index {index} is out of range and was never handed out"
        );

        if self.cells.is_empty() {
            return;
        }

        loop {
            let write = self.write_pos.load(Ordering::Acquire);

            if write == self.wrap_limit {
                Self::wrap_on_overflow(&self.write_pos, self.wrap_limit);
                continue;
            }

            if self
                .write_pos
                .compare_exchange_weak(write, write + 1, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                continue;
            }

            let cell = write % self.ring_len();

            // The previous occupant of this cell must be consumed by a
            // reader before the new value can go in.
            while self.cells[cell].load(Ordering::Acquire) != VACANT {
                thread::yield_now();
            }

            self.cells[cell].store(index + 1, Ordering::Release);

            return;
        }
    }
}

impl std::fmt::Debug for ConcurrentIndexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcurrentIndexer")
            .field("capacity", &(self.ring_len() / 2))
            .field("read_pos", &self.read_pos.load(Ordering::Relaxed))
            .field("write_pos", &self.write_pos.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hands_out_every_index_exactly_once() {
        let indexer = ConcurrentIndexer::with_capacity(5);

        let mut taken: Vec<usize> = (0..5).map(|_| indexer.next().get()).collect();
        taken.sort_unstable();

        assert_eq!(taken, vec![0, 1, 2, 3, 4]);
        assert!(indexer.next().is_empty());
    }

    #[test]
    fn released_indices_become_available_again() {
        let indexer = ConcurrentIndexer::with_capacity(2);

        let first = indexer.next().get();
        let second = indexer.next().get();
        assert!(indexer.next().is_empty());

        indexer.release(first);
        indexer.release(second);

        let mut retaken = vec![indexer.next().get(), indexer.next().get()];
        retaken.sort_unstable();

        let mut originals = vec![first, second];
        originals.sort_unstable();

        assert_eq!(retaken, originals);
    }

    #[test]
    fn zero_capacity_is_always_empty() {
        let indexer = ConcurrentIndexer::with_capacity(0);

        assert!(indexer.next().is_empty());
        assert!(indexer.next().is_empty());
    }

    #[test]
    fn single_capacity_cycles_through_its_one_index() {
        let indexer = ConcurrentIndexer::with_capacity(1);

        for _ in 0..10_000 {
            let index = indexer.next().get();
            assert_eq!(index, 0);
            assert!(indexer.next().is_empty());
            indexer.release(index);
        }
    }

    #[test]
    fn ring_wraps_cleanly_under_sustained_churn() {
        // Enough cycles to lap the 2N ring many times over.
        let indexer = ConcurrentIndexer::with_capacity(3);

        for _ in 0..50_000 {
            let a = indexer.next().get();
            let b = indexer.next().get();
            assert_ne!(a, b);
            indexer.release(b);
            indexer.release(a);
        }

        let mut drained: Vec<usize> = (0..3).map(|_| indexer.next().get()).collect();
        drained.sort_unstable();
        assert_eq!(drained, vec![0, 1, 2]);
    }
}
