//! Both indexers satisfy one contract; every check here runs against each of
//! them through the same generic body.

use std::collections::BTreeSet;
use std::sync::Mutex;
use std::thread;

use slot_pool::{ConcurrentIndexer, Indexer, MutexIndexer};

fn drains_to_the_full_index_set<I: Indexer>() {
    let indexer = I::with_capacity(6);

    let mut taken = BTreeSet::new();
    for _ in 0..6 {
        assert!(taken.insert(indexer.next().get()), "duplicate index");
    }

    assert_eq!(taken, (0..6).collect());
    assert!(indexer.next().is_empty());
}

fn conserves_indices_across_churn<I: Indexer>() {
    let indexer = I::with_capacity(4);

    for _ in 0..100 {
        let a = indexer.next().get();
        let b = indexer.next().get();
        indexer.release(a);
        indexer.release(b);
    }

    // After all churn, the full set drains out again.
    let drained: BTreeSet<usize> = (0..4).map(|_| indexer.next().get()).collect();
    assert_eq!(drained, (0..4).collect());
    assert!(indexer.next().is_empty());
}

fn concurrent_takers_never_share_an_index<I: Indexer>() {
    const THREADS: usize = 8;
    const CAPACITY: usize = 128;

    let indexer = I::with_capacity(CAPACITY);
    let per_thread: Mutex<Vec<Vec<usize>>> = Mutex::new(Vec::new());

    thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                let mut mine = Vec::new();
                loop {
                    let holder = indexer.next();
                    if holder.is_empty() {
                        break;
                    }
                    mine.push(holder.get());
                }
                per_thread
                    .lock()
                    .expect("recording lock poisoned")
                    .push(mine);
            });
        }
    });

    let per_thread = per_thread.into_inner().expect("recording lock poisoned");

    let union: BTreeSet<usize> = per_thread.iter().flatten().copied().collect();
    let total: usize = per_thread.iter().map(Vec::len).sum();

    // No duplicates anywhere, and everything was handed out to someone.
    assert_eq!(total, CAPACITY);
    assert_eq!(union, (0..CAPACITY).collect());
}

#[test]
fn mutex_indexer_drains_to_the_full_index_set() {
    drains_to_the_full_index_set::<MutexIndexer>();
}

#[test]
fn concurrent_indexer_drains_to_the_full_index_set() {
    drains_to_the_full_index_set::<ConcurrentIndexer>();
}

#[test]
fn mutex_indexer_conserves_indices_across_churn() {
    conserves_indices_across_churn::<MutexIndexer>();
}

#[test]
fn concurrent_indexer_conserves_indices_across_churn() {
    conserves_indices_across_churn::<ConcurrentIndexer>();
}

#[test]
fn mutex_indexer_concurrent_takers_never_share_an_index() {
    concurrent_takers_never_share_an_index::<MutexIndexer>();
}

#[test]
fn concurrent_indexer_concurrent_takers_never_share_an_index() {
    concurrent_takers_never_share_an_index::<ConcurrentIndexer>();
}
