use std::fmt::Debug;
use std::fs;

#[cfg(test)]
use std::sync::Arc;

use crate::NumaNodeId;

/// Linux exposes NUMA topology as a virtual filesystem. This trait abstracts
/// the handful of files we read, so the platform logic can be exercised
/// against mock content.
///
/// All reads are synchronous and blocking; the data never lives on a real
/// storage device.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Filesystem: Debug + Send + Sync + 'static {
    /// Contents of `/sys/devices/system/node/possible`, or `None` when the
    /// node directory does not exist (single-node systems).
    ///
    /// This is a cpulist format file (`0,1,2-4` style list).
    fn numa_node_possible_contents(&self) -> Option<String>;

    /// Contents of `/sys/devices/system/node/node{N}/cpulist`, or `None`
    /// when that node directory is absent.
    ///
    /// This is a cpulist format file (`0,1,2-4` style list).
    fn numa_node_cpulist_contents(&self, node: NumaNodeId) -> Option<String>;
}

#[derive(Debug)]
pub(crate) struct BuildTargetFilesystem;

impl Filesystem for BuildTargetFilesystem {
    fn numa_node_possible_contents(&self) -> Option<String> {
        fs::read_to_string("/sys/devices/system/node/possible").ok()
    }

    fn numa_node_cpulist_contents(&self, node: NumaNodeId) -> Option<String> {
        fs::read_to_string(format!("/sys/devices/system/node/node{node}/cpulist")).ok()
    }
}

/// Hides the real/mock filesystem choice behind a single wrapper type.
#[derive(Clone)]
pub(crate) enum FilesystemFacade {
    Real(&'static BuildTargetFilesystem),

    #[cfg(test)]
    Mock(Arc<MockFilesystem>),
}

impl FilesystemFacade {
    pub(crate) const fn real() -> Self {
        Self::Real(&BuildTargetFilesystem)
    }

    #[cfg(test)]
    pub(crate) fn from_mock(mock: MockFilesystem) -> Self {
        Self::Mock(Arc::new(mock))
    }
}

impl Filesystem for FilesystemFacade {
    fn numa_node_possible_contents(&self) -> Option<String> {
        match self {
            Self::Real(fs) => fs.numa_node_possible_contents(),
            #[cfg(test)]
            Self::Mock(mock) => mock.numa_node_possible_contents(),
        }
    }

    fn numa_node_cpulist_contents(&self, node: NumaNodeId) -> Option<String> {
        match self {
            Self::Real(fs) => fs.numa_node_cpulist_contents(node),
            #[cfg(test)]
            Self::Mock(mock) => mock.numa_node_cpulist_contents(node),
        }
    }
}

impl Debug for FilesystemFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Real(inner) => inner.fmt(f),
            #[cfg(test)]
            Self::Mock(inner) => inner.fmt(f),
        }
    }
}
