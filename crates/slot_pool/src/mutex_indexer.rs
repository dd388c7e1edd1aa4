use std::sync::Mutex;

use crate::{IndexHolder, Indexer};

/// The reference indexer: the [`Indexer`] contract under one lock.
///
/// State is a contiguous stack of indices and a cursor. [`next()`][1] pops
/// from the cursor, [`release()`][2] pushes back under it. Pools default to
/// this implementation; the lock-free [`ConcurrentIndexer`][3] is tested
/// against it.
///
/// [1]: Indexer::next
/// [2]: Indexer::release
/// [3]: crate::ConcurrentIndexer
#[derive(Debug)]
pub struct MutexIndexer {
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    indices: Vec<usize>,
    cursor: usize,
}

impl Indexer for MutexIndexer {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(State {
                indices: (0..capacity).collect(),
                cursor: 0,
            }),
        }
    }

    fn next(&self) -> IndexHolder {
        let mut state = self.state.lock().expect("indexer lock poisoned");

        if state.cursor == state.indices.len() {
            return IndexHolder::empty();
        }

        let index = state.indices[state.cursor];
        state.cursor += 1;

        IndexHolder::new(index)
    }

    fn release(&self, index: usize) {
        let mut state = self.state.lock().expect("indexer lock poisoned");

        debug_assert!(
            state.cursor > 0,
            "released index {index} but nothing is handed out"
        );
        debug_assert!(
            index < state.indices.len(),
            "released index {index} is out of range"
        );

        state.cursor -= 1;
        let cursor = state.cursor;
        state.indices[cursor] = index;
    }
}
