use std::collections::BTreeSet;
use std::fmt::Debug;

#[cfg(test)]
use std::sync::Arc;

use nonempty::NonEmpty;

use crate::pal::{BUILD_TARGET_PLATFORM, BuildTargetPlatform, Platform};
#[cfg(test)]
use crate::pal::MockPlatform;
use crate::{CoreId, NumaNode, Result};

/// Hides the real/mock platform choice behind a single wrapper type.
#[derive(Clone)]
pub(crate) enum PlatformFacade {
    Real(&'static BuildTargetPlatform),

    #[cfg(test)]
    Mock(Arc<MockPlatform>),
}

impl PlatformFacade {
    pub(crate) fn real() -> Self {
        Self::Real(&BUILD_TARGET_PLATFORM)
    }

    #[cfg(test)]
    pub(crate) fn from_mock(mock: MockPlatform) -> Self {
        Self::Mock(Arc::new(mock))
    }
}

impl Platform for PlatformFacade {
    fn current_thread_cores(&self) -> Result<NonEmpty<CoreId>> {
        match self {
            Self::Real(platform) => platform.current_thread_cores(),
            #[cfg(test)]
            Self::Mock(mock) => mock.current_thread_cores(),
        }
    }

    fn current_thread_numa_nodes(&self) -> Result<BTreeSet<NumaNode>> {
        match self {
            Self::Real(platform) => platform.current_thread_numa_nodes(),
            #[cfg(test)]
            Self::Mock(mock) => mock.current_thread_numa_nodes(),
        }
    }

    fn pin_current_thread_to(&self, cores: &BTreeSet<CoreId>) -> Result<()> {
        match self {
            Self::Real(platform) => platform.pin_current_thread_to(cores),
            #[cfg(test)]
            Self::Mock(mock) => mock.pin_current_thread_to(cores),
        }
    }
}

impl Debug for PlatformFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Real(inner) => inner.fmt(f),
            #[cfg(test)]
            Self::Mock(inner) => inner.fmt(f),
        }
    }
}

#[cfg(test)]
impl From<MockPlatform> for PlatformFacade {
    fn from(mock: MockPlatform) -> Self {
        Self::from_mock(mock)
    }
}
