//! Multi-threaded pool scenarios: exhaustion by many threads and sustained
//! churn on a pool far smaller than its user count.

use std::collections::BTreeSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use slot_pool::{ConcurrentIndexer, RuntimePool};

#[test]
fn threads_exhaust_the_pool_without_overlap() {
    const THREADS: usize = 22;
    const CAPACITY: usize = 567;

    let pool: RuntimePool<u64, ConcurrentIndexer> = RuntimePool::new(CAPACITY);
    let recorded: Mutex<Vec<Vec<usize>>> = Mutex::new(Vec::new());

    thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                // Hold every taken item until the pool is drained, so no
                // other thread can ever see a recycled slot.
                let mut held = Vec::new();
                let mut indices = Vec::new();

                loop {
                    let item = pool.take();
                    if item.is_empty() {
                        break;
                    }
                    indices.push(item.pool_index());
                    held.push(item);
                }

                recorded
                    .lock()
                    .expect("recording lock poisoned")
                    .push(indices);
            });
        }
    });

    let recorded = recorded.into_inner().expect("recording lock poisoned");

    let union: BTreeSet<usize> = recorded.iter().flatten().copied().collect();
    let total: usize = recorded.iter().map(Vec::len).sum();

    // The union covers every slot and no slot was handed to two threads.
    assert_eq!(union, (0..CAPACITY).collect());
    assert_eq!(total, CAPACITY);
}

#[test]
fn oversubscribed_churn_stays_unique_and_in_range() {
    const THREADS: usize = 13;
    const CAPACITY: usize = 5;
    const ITERATIONS: usize = 2_000;

    let pool: RuntimePool<u64, ConcurrentIndexer> = RuntimePool::new(CAPACITY);

    // One claim flag per slot: set on take, cleared just before hand-back.
    // A take observing an already-set flag means two live holders shared a
    // slot, which must never happen.
    let claimed: Vec<AtomicBool> = (0..CAPACITY).map(|_| AtomicBool::new(false)).collect();
    let observed: Mutex<BTreeSet<usize>> = Mutex::new(BTreeSet::new());

    thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                let mut seen = BTreeSet::new();

                for _ in 0..ITERATIONS {
                    let item = pool.take();
                    if item.is_empty() {
                        thread::yield_now();
                        continue;
                    }

                    let index = item.pool_index();
                    assert!(index < CAPACITY, "index {index} out of range");
                    assert!(
                        !claimed[index].swap(true, Ordering::SeqCst),
                        "slot {index} was live in two holders at once"
                    );
                    seen.insert(index);

                    thread::yield_now();

                    claimed[index].store(false, Ordering::SeqCst);
                    drop(item);
                }

                observed
                    .lock()
                    .expect("recording lock poisoned")
                    .append(&mut seen);
            });
        }
    });

    // Thirteen threads churning five slots touch every slot eventually.
    let observed = observed.into_inner().expect("recording lock poisoned");
    assert_eq!(observed, (0..CAPACITY).collect());
}
