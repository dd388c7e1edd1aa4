//! Discovery of the processor cores and NUMA nodes visible to the current
//! thread, and control over where that thread is allowed to run.
//!
//! Everything here is scoped to the *calling thread*: if the operating
//! system has already confined the thread to a subset of the machine, only
//! that subset is reported, and only that subset can be pinned to. This is
//! what makes the crate usable as the placement layer of thread pools that
//! pin one worker per core.
//!
//! # Quick start
//!
//! ```
//! use cpu_topology::Processor;
//!
//! let processor = Processor::new();
//!
//! let cores = processor.available_cores().expect("topology query failed");
//! println!("{} cores available to this thread", cores.len());
//!
//! for node in processor.available_numa_nodes().expect("topology query failed") {
//!     println!("{node}");
//! }
//! ```
//!
//! # Supported platforms
//!
//! The real backend targets the Linux scheduler affinity API and sysfs NUMA
//! topology. On any other build target the operations exist but report
//! [`Error::UnsupportedPlatform`].

mod core;
mod cpulist;
mod errors;
mod numa_node;
mod processor;

pub use self::core::*;
pub use errors::*;
pub use numa_node::*;
pub use processor::*;

pub(crate) mod pal;
