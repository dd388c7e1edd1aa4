use std::collections::BTreeSet;

use nonempty::NonEmpty;

use crate::pal::Platform;
use crate::{CoreId, Error, NumaNode, Result};

/// Singleton instance of `BuildTargetPlatform`, used by public API types
/// to hook up to the correct PAL implementation.
pub(crate) static BUILD_TARGET_PLATFORM: BuildTargetPlatform = BuildTargetPlatform;

/// Fallback backend for build targets without an affinity API. Every
/// operation reports [`Error::UnsupportedPlatform`].
#[derive(Debug)]
pub(crate) struct BuildTargetPlatform;

impl Platform for BuildTargetPlatform {
    fn current_thread_cores(&self) -> Result<NonEmpty<CoreId>> {
        Err(Error::UnsupportedPlatform)
    }

    fn current_thread_numa_nodes(&self) -> Result<BTreeSet<NumaNode>> {
        Err(Error::UnsupportedPlatform)
    }

    fn pin_current_thread_to(&self, _cores: &BTreeSet<CoreId>) -> Result<()> {
        Err(Error::UnsupportedPlatform)
    }
}
