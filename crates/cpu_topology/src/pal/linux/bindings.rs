use std::fmt::Debug;
use std::io;
use std::mem;

#[cfg(test)]
use std::sync::Arc;

use libc::cpu_set_t;

/// Thin seam over the libc scheduling calls, present so the platform logic
/// can be exercised against mock bindings.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Bindings: Debug + Send + Sync + 'static {
    /// Reads the affinity mask of the calling thread.
    fn sched_getaffinity_current(&self) -> Result<cpu_set_t, io::Error>;

    /// Replaces the affinity mask of the calling thread.
    fn sched_setaffinity_current(&self, cpuset: &cpu_set_t) -> Result<(), io::Error>;
}

#[derive(Debug)]
pub(crate) struct BuildTargetBindings;

impl Bindings for BuildTargetBindings {
    fn sched_getaffinity_current(&self) -> Result<cpu_set_t, io::Error> {
        // SAFETY: Zero-initialized cpu_set_t is a valid value.
        let mut cpu_set: cpu_set_t = unsafe { mem::zeroed() };

        // SAFETY: A pid of 0 targets the calling thread; the mask pointer is
        // valid for writes of the size we pass.
        let result =
            unsafe { libc::sched_getaffinity(0, mem::size_of::<cpu_set_t>(), &mut cpu_set) };

        if result == 0 {
            Ok(cpu_set)
        } else {
            Err(io::Error::last_os_error())
        }
    }

    fn sched_setaffinity_current(&self, cpuset: &cpu_set_t) -> Result<(), io::Error> {
        // SAFETY: A pid of 0 targets the calling thread; the mask pointer is
        // valid for reads of the size we pass.
        let result = unsafe { libc::sched_setaffinity(0, mem::size_of::<cpu_set_t>(), cpuset) };

        if result == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }
}

/// Hides the real/mock bindings choice behind a single wrapper type.
#[derive(Clone)]
pub(crate) enum BindingsFacade {
    Real(&'static BuildTargetBindings),

    #[cfg(test)]
    Mock(Arc<MockBindings>),
}

impl BindingsFacade {
    pub(crate) const fn real() -> Self {
        Self::Real(&BuildTargetBindings)
    }

    #[cfg(test)]
    pub(crate) fn from_mock(mock: MockBindings) -> Self {
        Self::Mock(Arc::new(mock))
    }
}

impl Bindings for BindingsFacade {
    fn sched_getaffinity_current(&self) -> Result<cpu_set_t, io::Error> {
        match self {
            Self::Real(bindings) => bindings.sched_getaffinity_current(),
            #[cfg(test)]
            Self::Mock(mock) => mock.sched_getaffinity_current(),
        }
    }

    fn sched_setaffinity_current(&self, cpuset: &cpu_set_t) -> Result<(), io::Error> {
        match self {
            Self::Real(bindings) => bindings.sched_setaffinity_current(cpuset),
            #[cfg(test)]
            Self::Mock(mock) => mock.sched_setaffinity_current(cpuset),
        }
    }
}

impl Debug for BindingsFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Real(inner) => inner.fmt(f),
            #[cfg(test)]
            Self::Mock(inner) => inner.fmt(f),
        }
    }
}
