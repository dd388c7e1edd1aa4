use std::collections::BTreeSet;

use cpu_topology::{Core, NumaNode};

use crate::{Error, Result, WorkerPool};

/// Builds a [`WorkerPool`] targeting an explicit core set or the cores of
/// one NUMA node.
///
/// A complete configuration names exactly one placement source - cores or a
/// node, not both - and a non-zero thread count per core. The built pool has
/// `threads_per_core * target_core_count` workers, each pinned to its own
/// single core.
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
/// let core_count = cores.len();
///
/// let pool = WorkerPool::builder()
///     .threads_per_core(2)
///     .on_cores(cores)
///     .build()
///     .expect("configuration was complete");
///
/// assert_eq!(pool.len(), 2 * core_count);
/// ```
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct WorkerPoolBuilder {
    threads_per_core: Option<u32>,
    cores: Option<BTreeSet<Core>>,
    numa_node: Option<NumaNode>,
}

impl WorkerPoolBuilder {
    /// Creates a builder with nothing configured yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many worker threads to spawn for each target core.
    ///
    /// Required; zero is rejected at [`build()`][Self::build] time.
    pub fn threads_per_core(mut self, count: u32) -> Self {
        self.threads_per_core = Some(count);
        self
    }

    /// Targets an explicit set of cores.
    ///
    /// Mutually exclusive with [`on_numa_node()`][Self::on_numa_node].
    pub fn on_cores(mut self, cores: BTreeSet<Core>) -> Self {
        self.cores = Some(cores);
        self
    }

    /// Targets every core of one NUMA node.
    ///
    /// Mutually exclusive with [`on_cores()`][Self::on_cores].
    pub fn on_numa_node(mut self, node: NumaNode) -> Self {
        self.numa_node = Some(node);
        self
    }

    /// The configured thread count per core, if any.
    #[must_use]
    pub fn configured_threads_per_core(&self) -> Option<u32> {
        self.threads_per_core
    }

    /// The configured explicit core set, if any.
    #[must_use]
    pub fn configured_cores(&self) -> Option<&BTreeSet<Core>> {
        self.cores.as_ref()
    }

    /// The configured NUMA node target, if any.
    #[must_use]
    pub fn configured_numa_node(&self) -> Option<&NumaNode> {
        self.numa_node.as_ref()
    }

    /// Spawns the pool.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] when the thread count is unset or
    /// zero, when no placement source was named, or when both were.
    pub fn build(self) -> Result<WorkerPool> {
        let threads_per_core = match self.threads_per_core {
            None | Some(0) => {
                return Err(Error::InvalidConfiguration(
                    "threads per core must be set and non-zero",
                ));
            }
            Some(count) => count,
        };

        let target_cores = match (self.cores, self.numa_node) {
            (Some(_), Some(_)) => {
                return Err(Error::InvalidConfiguration(
                    "a core set and a NUMA node cannot both be targeted",
                ));
            }
            (None, None) => {
                return Err(Error::InvalidConfiguration(
                    "either a core set or a NUMA node target is required",
                ));
            }
            (Some(cores), None) => cores,
            (None, Some(node)) => node.cores().clone(),
        };

        Ok(WorkerPool::start(threads_per_core, &target_cores))
    }
}
