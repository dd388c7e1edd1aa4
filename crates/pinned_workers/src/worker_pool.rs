use std::any::Any;
use std::collections::BTreeSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::thread::{self, JoinHandle};

use cpu_topology::{Core, Processor};
use tracing::{debug, warn};

use crate::task_handle::{Completion, TaskHandle};
use crate::work_queue::WorkQueue;
use crate::{Error, Result, WorkerPoolBuilder};

type Task = Box<dyn FnOnce() + Send + 'static>;

/// What travels through the pool's queue: work, or the shutdown sentinel
/// that makes the consuming worker exit its loop.
pub(crate) enum WorkItem {
    Job(Task),
    Poison,
}

// Pool lifecycle. Submission is legal only while running; shutdown walks
// Running -> Draining -> Stopped and is idempotent.
const RUNNING: u8 = 0;
const DRAINING: u8 = 1;
const STOPPED: u8 = 2;

/// A pool of worker threads, each pinned to a single core of the configured
/// target set.
///
/// Build one through [`WorkerPool::builder()`], naming either an explicit
/// core set or a NUMA node, plus a thread count per core. Every worker pins
/// itself to its own core before it starts consuming, so a task always runs
/// with a single-core affinity.
///
/// Tasks are consumed from one shared FIFO. [`submit()`][Self::submit] is
/// fire-and-forget; [`submit_with_result()`][Self::submit_with_result]
/// additionally hands back a [`TaskHandle`] that resolves to the task's
/// outcome.
///
/// [`shutdown()`][Self::shutdown] drains cooperatively: already queued tasks
/// ahead of the shutdown sentinels still run, in-flight tasks finish, then
/// every worker is joined. Dropping the pool shuts it down if that has not
/// happened yet.
///
/// # Example
///
/// ```
/// use cpu_topology::Processor;
/// use pinned_workers::WorkerPool;
///
/// let cores = Processor::new()
///     .available_cores()
///     .expect("topology query failed");
///
/// let mut pool = WorkerPool::builder()
///     .threads_per_core(1)
///     .on_cores(cores)
///     .build()
///     .expect("configuration was complete");
///
/// let answer = pool
///     .submit_with_result(|| 6 * 7)
///     .expect("pool is running")
///     .join()
///     .expect("task ran to completion");
/// assert_eq!(answer, 42);
///
/// pool.shutdown();
/// ```
pub struct WorkerPool {
    queue: Arc<WorkQueue<WorkItem>>,
    workers: Vec<JoinHandle<()>>,
    state: AtomicU8,
    worker_count: usize,
}

impl WorkerPool {
    /// Starts building a pool.
    #[must_use]
    pub fn builder() -> WorkerPoolBuilder {
        WorkerPoolBuilder::new()
    }

    pub(crate) fn start(threads_per_core: u32, target_cores: &BTreeSet<Core>) -> Self {
        let queue = Arc::new(WorkQueue::new());

        let mut workers = Vec::with_capacity(target_cores.len() * threads_per_core as usize);

        for core in target_cores {
            for replica in 0..threads_per_core {
                workers.push(spawn_worker(*core, replica, Arc::clone(&queue)));
            }
        }

        debug!(workers = workers.len(), "worker pool started");

        Self {
            worker_count: workers.len(),
            queue,
            workers,
            state: AtomicU8::new(RUNNING),
        }
    }

    /// Submits a fire-and-forget task.
    ///
    /// A task that panics is caught, logged and swallowed so it cannot take
    /// its worker down; use [`submit_with_result()`][Self::submit_with_result]
    /// when the caller needs to observe failures.
    ///
    /// # Errors
    ///
    /// [`Error::Stopped`] once shutdown has begun.
    pub fn submit(&self, task: impl FnOnce() + Send + 'static) -> Result<()> {
        self.ensure_running()?;

        self.queue.push(WorkItem::Job(Box::new(task)));

        Ok(())
    }

    /// Submits a task and returns a handle resolving to its outcome.
    ///
    /// A panic inside the task is captured into the handle rather than
    /// logged; [`TaskHandle::join()`] surfaces it like a panicked thread
    /// join.
    ///
    /// # Errors
    ///
    /// [`Error::Stopped`] once shutdown has begun.
    pub fn submit_with_result<R, F>(&self, task: F) -> Result<TaskHandle<R>>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        self.ensure_running()?;

        let completion = Completion::new();
        let fulfiller = Arc::clone(&completion);

        self.queue.push(WorkItem::Job(Box::new(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(task));
            fulfiller.fulfill(outcome);
        })));

        Ok(TaskHandle::new(completion))
    }

    /// Whether any submitted task is still waiting to be picked up.
    ///
    /// A `false` only means the queue is empty; tasks already picked up may
    /// still be running.
    #[must_use]
    pub fn has_work(&self) -> bool {
        self.queue.has_work()
    }

    /// Total number of worker threads the pool was built with.
    ///
    /// Stable across the pool's whole life, including after shutdown.
    #[must_use]
    pub fn len(&self) -> usize {
        self.worker_count
    }

    /// Whether the pool was built with no workers at all (an empty target
    /// core set).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.worker_count == 0
    }

    /// Stops the pool: refuses further submissions, lets queued and running
    /// tasks finish, then joins every worker.
    ///
    /// One shutdown sentinel per worker is enqueued behind any tasks already
    /// queued, so those still run; each worker exits when it consumes its
    /// sentinel. Idempotent - any call after the first returns immediately.
    pub fn shutdown(&mut self) {
        if self
            .state
            .compare_exchange(RUNNING, DRAINING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        for _ in 0..self.worker_count {
            self.queue.push(WorkItem::Poison);
        }

        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                warn!("worker thread exited by panic");
            }
        }

        self.state.store(STOPPED, Ordering::Release);

        debug!("worker pool stopped");
    }

    fn ensure_running(&self) -> Result<()> {
        if self.state.load(Ordering::Acquire) == RUNNING {
            Ok(())
        } else {
            Err(Error::Stopped)
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.worker_count)
            .field("state", &self.state.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

fn spawn_worker(core: Core, replica: u32, queue: Arc<WorkQueue<WorkItem>>) -> JoinHandle<()> {
    thread::Builder::new()
        .name(format!("worker-{}-{replica}", core.id()))
        .spawn(move || {
            let pinned: BTreeSet<Core> = [core].into_iter().collect();

            // A worker that cannot reach its core is useless; failing loudly
            // here surfaces at join time.
            Processor::new()
                .set_thread_affinity(&pinned)
                .expect("failed to pin worker thread to its core");

            debug!(core = core.id(), replica, "worker pinned and consuming");

            loop {
                match queue.take() {
                    WorkItem::Job(task) => {
                        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
                            warn!(
                                core = core.id(),
                                replica,
                                "task panicked: {}",
                                panic_message(payload.as_ref())
                            );
                        }
                    }
                    WorkItem::Poison => break,
                }
            }

            debug!(core = core.id(), replica, "worker exiting");
        })
        .expect("failed to spawn worker thread")
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("opaque panic payload")
}
