//! Worker pools whose threads are pinned one-per-core to a chosen set of
//! cores or to one NUMA node.
//!
//! A [`WorkerPool`] owns its threads and one shared task queue. Each worker
//! pins itself to a single core (via [`cpu_topology`]) before consuming, so
//! tasks always run with single-core affinity - the point of the whole
//! exercise when chasing cache locality.
//!
//! Submission comes in two shapes: [`WorkerPool::submit()`] fire-and-forget,
//! and [`WorkerPool::submit_with_result()`] returning a [`TaskHandle`] the
//! caller can join for the task's outcome, including a panic.
//!
//! Shutdown is cooperative and idempotent: queued tasks run, in-flight tasks
//! finish, workers exit as they consume their shutdown sentinels, and the
//! pool joins them all.
//!
//! # Quick start
//!
//! ```
//! use cpu_topology::Processor;
//! use pinned_workers::WorkerPool;
//!
//! let cores = Processor::new()
//!     .available_cores()
//!     .expect("topology query failed");
//!
//! let mut pool = WorkerPool::builder()
//!     .threads_per_core(1)
//!     .on_cores(cores)
//!     .build()
//!     .expect("configuration was complete");
//!
//! let handle = pool
//!     .submit_with_result(|| "ran on a pinned worker")
//!     .expect("pool is running");
//! println!("{}", handle.join().expect("task ran to completion"));
//!
//! pool.shutdown();
//! ```

mod builder;
mod errors;
mod task_handle;
mod work_queue;
mod worker_pool;

pub use builder::*;
pub use errors::*;
pub use task_handle::TaskHandle;
pub use worker_pool::WorkerPool;
