use std::collections::BTreeSet;

use crate::pal::{Platform, PlatformFacade};
use crate::{Core, NumaNode, Result};

/// Entry point for topology queries and affinity control, always scoped to
/// the calling thread.
///
/// Discovery respects whatever constraints the operating system has already
/// placed on the thread (cgroups, a prior pinning, `taskset`, ...): a core
/// the thread may not run on is never reported and a NUMA node none of whose
/// cores are permitted is omitted entirely.
///
/// On build targets without an affinity API every operation reports
/// [`Error::UnsupportedPlatform`][crate::Error::UnsupportedPlatform].
///
/// # Example
///
/// ```
/// use cpu_topology::Processor;
///
/// let processor = Processor::new();
///
/// for core in processor.available_cores().expect("topology query failed") {
///     println!("may run on {core}");
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Processor {
    pal: PlatformFacade,
}

impl Processor {
    /// Creates a processor capability backed by the real platform.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pal: PlatformFacade::real(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_platform(pal: PlatformFacade) -> Self {
        Self { pal }
    }

    /// The cores the calling thread is permitted to run on.
    ///
    /// # Errors
    ///
    /// [`UnsupportedPlatform`][crate::Error::UnsupportedPlatform] on build
    /// targets without a backend; [`Affinity`][crate::Error::Affinity] when
    /// the affinity mask cannot be read.
    pub fn available_cores(&self) -> Result<BTreeSet<Core>> {
        Ok(self
            .pal
            .current_thread_cores()?
            .into_iter()
            .map(Core::new)
            .collect())
    }

    /// The NUMA nodes the calling thread can execute on, each carrying only
    /// the cores the thread is permitted to use.
    ///
    /// Nodes on which the thread cannot run at all are not reported.
    ///
    /// # Errors
    ///
    /// [`UnsupportedPlatform`][crate::Error::UnsupportedPlatform] on build
    /// targets without a backend; [`Affinity`][crate::Error::Affinity] or
    /// [`InvalidCpulist`][crate::Error::InvalidCpulist] when the platform
    /// reports unusable topology data.
    pub fn available_numa_nodes(&self) -> Result<BTreeSet<NumaNode>> {
        self.pal.current_thread_numa_nodes()
    }

    /// Restricts the calling thread to the given cores.
    ///
    /// # Errors
    ///
    /// [`UnsupportedPlatform`][crate::Error::UnsupportedPlatform] on build
    /// targets without a backend; [`Affinity`][crate::Error::Affinity] when
    /// the set is empty or the operating system rejects the mask.
    pub fn set_thread_affinity(&self, cores: &BTreeSet<Core>) -> Result<()> {
        let core_ids = cores.iter().map(|core| core.id()).collect();
        self.pal.pin_current_thread_to(&core_ids)
    }
}

impl Default for Processor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use nonempty::NonEmpty;

    use super::*;
    use crate::pal::MockPlatform;
    use crate::{Error, NumaNode};

    #[test]
    fn available_cores_wraps_platform_ids() {
        let mut platform = MockPlatform::new();
        platform
            .expect_current_thread_cores()
            .times(1)
            .returning(|| Ok(NonEmpty::from_vec(vec![4, 0, 2]).unwrap()));

        let processor = Processor::with_platform(PlatformFacade::from_mock(platform));

        let cores = processor.available_cores().unwrap();
        let ids: Vec<_> = cores.iter().map(|core| core.id()).collect();

        // A BTreeSet reports the cores in ascending ID order.
        assert_eq!(ids, vec![0, 2, 4]);
    }

    #[test]
    fn available_numa_nodes_passes_through() {
        let mut platform = MockPlatform::new();
        platform
            .expect_current_thread_numa_nodes()
            .times(1)
            .returning(|| {
                Ok([NumaNode::new(0, [Core::new(0)].into_iter().collect())]
                    .into_iter()
                    .collect())
            });

        let processor = Processor::with_platform(PlatformFacade::from_mock(platform));

        let nodes = processor.available_numa_nodes().unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes.first().unwrap().id(), 0);
    }

    #[test]
    fn set_thread_affinity_forwards_core_ids() {
        let mut platform = MockPlatform::new();
        platform
            .expect_pin_current_thread_to()
            .withf(|core_ids| core_ids.iter().copied().eq([1, 3]))
            .times(1)
            .returning(|_| Ok(()));

        let processor = Processor::with_platform(PlatformFacade::from_mock(platform));

        let cores = [Core::new(1), Core::new(3)].into_iter().collect();
        processor.set_thread_affinity(&cores).unwrap();
    }

    #[test]
    fn platform_errors_surface_unchanged() {
        let mut platform = MockPlatform::new();
        platform
            .expect_current_thread_cores()
            .times(1)
            .returning(|| Err(Error::UnsupportedPlatform));

        let processor = Processor::with_platform(PlatformFacade::from_mock(platform));

        assert!(matches!(
            processor.available_cores(),
            Err(Error::UnsupportedPlatform)
        ));
    }

    #[cfg(all(target_os = "linux", not(miri)))]
    mod real_platform {
        use super::*;

        #[test]
        fn discovery_smoke_test() {
            let processor = Processor::new();

            let cores = processor.available_cores().unwrap();
            assert!(!cores.is_empty());

            let nodes = processor.available_numa_nodes().unwrap();
            assert!(!nodes.is_empty());

            // Every node core is also an available core.
            for node in &nodes {
                for core in node.cores() {
                    assert!(cores.contains(core));
                }
            }
        }

        #[test]
        fn pin_to_own_cores_succeeds() {
            // Run on a scratch thread so the test harness thread keeps its
            // original affinity.
            std::thread::spawn(|| {
                let processor = Processor::new();
                let cores = processor.available_cores().unwrap();

                processor.set_thread_affinity(&cores).unwrap();

                let narrowed: BTreeSet<Core> =
                    [*cores.first().unwrap()].into_iter().collect();
                processor.set_thread_affinity(&narrowed).unwrap();

                assert_eq!(processor.available_cores().unwrap(), narrowed);
            })
            .join()
            .unwrap();
        }
    }
}
