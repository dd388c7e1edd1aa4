//! Spawns one pinned worker per available core and lets each report where
//! it ran.

use cpu_topology::Processor;
use pinned_workers::WorkerPool;

fn main() {
    let processor = Processor::new();

    let cores = match processor.available_cores() {
        Ok(cores) => cores,
        Err(error) => {
            println!("cannot discover cores: {error}");
            return;
        }
    };

    let mut pool = WorkerPool::builder()
        .threads_per_core(1)
        .on_cores(cores)
        .build()
        .expect("configuration was complete");

    println!("{} pinned workers started", pool.len());

    let handles: Vec<_> = (0..pool.len())
        .map(|task| {
            pool.submit_with_result(move || {
                let affinity = Processor::new()
                    .available_cores()
                    .expect("a pinned worker can still query its affinity");
                (task, affinity)
            })
            .expect("pool is running")
        })
        .collect();

    for handle in handles {
        let (task, affinity) = handle.join().expect("task ran to completion");
        for core in affinity {
            println!("task {task} ran on {core}");
        }
    }

    pool.shutdown();
    println!("all workers joined");
}
