use std::collections::BTreeSet;
use std::io;
use std::mem;

use itertools::Itertools;
use nonempty::NonEmpty;

use crate::cpulist;
use crate::pal::Platform;
use crate::pal::linux::{Bindings, BindingsFacade, Filesystem, FilesystemFacade};
use crate::{Core, CoreId, NumaNode, NumaNodeId, Result};

/// Singleton instance of `BuildTargetPlatform`, used by public API types
/// to hook up to the correct PAL implementation.
pub(crate) static BUILD_TARGET_PLATFORM: BuildTargetPlatform =
    BuildTargetPlatform::new(BindingsFacade::real(), FilesystemFacade::real());

/// The platform that matches the crate's build target.
///
/// Core discovery goes through the scheduler affinity syscalls; NUMA layout
/// comes from the sysfs node directory. Systems where that directory is
/// absent are treated as one node holding everything, which is also what the
/// kernel means by its absence.
#[derive(Debug)]
pub(crate) struct BuildTargetPlatform {
    bindings: BindingsFacade,
    fs: FilesystemFacade,
}

impl Platform for BuildTargetPlatform {
    fn current_thread_cores(&self) -> Result<NonEmpty<CoreId>> {
        let mask = self.bindings.sched_getaffinity_current()?;

        let cores = (0..max_probed_core_id())
            // SAFETY: No safety requirements beyond an in-range bit index,
            // which the iteration bound guarantees.
            .filter(|core_id| unsafe { libc::CPU_ISSET(*core_id as usize, &mask) })
            .collect_vec();

        Ok(NonEmpty::from_vec(cores).expect(
            "current thread has no cores in its affinity mask - impossible because this code is running on one",
        ))
    }

    fn current_thread_numa_nodes(&self) -> Result<BTreeSet<NumaNode>> {
        let allowed: BTreeSet<CoreId> = self.current_thread_cores()?.into_iter().collect();

        let node_map = match self.numa_node_map()? {
            Some(map) => map,
            // No node directory: the whole system is one memory domain.
            None => [(0, allowed.iter().copied().collect_vec())]
                .into_iter()
                .collect(),
        };

        Ok(node_map
            .into_iter()
            .filter_map(|(node, cores)| {
                let permitted: BTreeSet<Core> = cores
                    .into_iter()
                    .filter(|core| allowed.contains(core))
                    .map(Core::new)
                    .collect();

                if permitted.is_empty() {
                    // The thread cannot execute anywhere in this node.
                    return None;
                }

                Some(NumaNode::new(node, permitted))
            })
            .collect())
    }

    fn pin_current_thread_to(&self, cores: &BTreeSet<CoreId>) -> Result<()> {
        if cores.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "cannot pin a thread to an empty core set",
            )
            .into());
        }

        // SAFETY: Zero-initialized cpu_set_t is a valid value.
        let mut cpu_set: libc::cpu_set_t = unsafe { mem::zeroed() };

        for core_id in cores {
            // SAFETY: No safety requirements beyond an in-range bit index.
            unsafe {
                libc::CPU_SET(*core_id as usize, &mut cpu_set);
            }
        }

        self.bindings.sched_setaffinity_current(&cpu_set)?;
        Ok(())
    }
}

impl BuildTargetPlatform {
    pub(super) const fn new(bindings: BindingsFacade, fs: FilesystemFacade) -> Self {
        Self { bindings, fs }
    }

    // May return None if everything is in a single NUMA node.
    //
    // Otherwise, returns for each NUMA node the cores that belong to it,
    // unfiltered by thread affinity.
    fn numa_node_map(&self) -> Result<Option<foldhash::HashMap<NumaNodeId, Vec<CoreId>>>> {
        let Some(possible) = self.fs.numa_node_possible_contents() else {
            return Ok(None);
        };

        let node_ids = cpulist::parse(possible.trim())?;

        let map = node_ids
            .into_iter()
            .filter_map(|node| {
                let contents = self.fs.numa_node_cpulist_contents(node)?;
                Some(cpulist::parse(contents.trim()).map(|cores| (node, cores)))
            })
            .collect::<Result<foldhash::HashMap<_, _>>>()?;

        Ok(Some(map))
    }
}

fn max_probed_core_id() -> CoreId {
    // The fixed-size libc mask cannot describe cores beyond this bit anyway.
    libc::CPU_SETSIZE as CoreId
}
