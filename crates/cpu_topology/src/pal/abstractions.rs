use std::collections::BTreeSet;
use std::fmt::Debug;

use nonempty::NonEmpty;

use crate::{CoreId, NumaNode, Result};

/// The platform operations the public API is built on.
///
/// There is one implementation per build target plus a mock for unit tests.
/// Public types never talk to the operating system directly; they go through
/// a [`PlatformFacade`][crate::pal::PlatformFacade] holding one of these.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Platform: Debug + Send + Sync + 'static {
    /// IDs of every core the current thread is allowed to execute on.
    ///
    /// Non-empty by construction: the calling thread is running on one of
    /// these cores right now.
    fn current_thread_cores(&self) -> Result<NonEmpty<CoreId>>;

    /// The NUMA nodes holding at least one core the current thread is
    /// allowed to execute on, each carrying only those permitted cores.
    ///
    /// Platforms that expose no NUMA information report a single synthetic
    /// node 0 covering every permitted core.
    fn current_thread_numa_nodes(&self) -> Result<BTreeSet<NumaNode>>;

    /// Restricts the current thread to the given cores.
    fn pin_current_thread_to(&self, cores: &BTreeSet<CoreId>) -> Result<()>;
}
