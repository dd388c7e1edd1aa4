//! Lends buffers out of a small pool and shows what happens when it runs
//! dry.

use slot_pool::RuntimePool;

fn main() {
    let pool: RuntimePool<Vec<u8>> = RuntimePool::with_reset(2, Vec::clear);

    let mut first = pool.take();
    first.get_mut().extend_from_slice(b"first borrower");
    println!(
        "slot {} holds {} bytes",
        first.pool_index(),
        first.get().len()
    );

    let second = pool.take();
    println!("slot {} is also out", second.pool_index());

    let third = pool.take();
    println!("third take while drained: empty = {}", third.is_empty());

    drop(first);

    let reused = pool.take();
    println!(
        "after one hand-back, slot {} is available again with {} bytes",
        reused.pool_index(),
        reused.get().len()
    );
}
