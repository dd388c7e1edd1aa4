use std::collections::BTreeSet;
use std::fmt::{self, Display};

use crate::Core;
use crate::cpulist;

/// A NUMA node identifier, matching the numeric identifier used by the
/// standard tooling of the operating system.
///
/// Values are not guaranteed to be sequential or contiguous, nor to start
/// from zero.
pub type NumaNodeId = u32;

/// One memory-affinity domain and the cores within it.
///
/// Instances obtained from [`Processor::available_numa_nodes()`][1] carry
/// only the cores the calling thread is permitted to run on, so a node never
/// advertises cores that pinning could not honor.
///
/// Nodes order by ID. Two nodes are equal when both the ID and the core set
/// match.
///
/// [1]: crate::Processor::available_numa_nodes
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NumaNode {
    id: NumaNodeId,
    cores: BTreeSet<Core>,
}

impl NumaNode {
    /// Creates a node from its ID and the cores it contains.
    #[must_use]
    pub fn new(id: NumaNodeId, cores: BTreeSet<Core>) -> Self {
        Self { id, cores }
    }

    /// The operating system identifier of this node.
    #[must_use]
    pub fn id(&self) -> NumaNodeId {
        self.id
    }

    /// The cores in this node.
    #[must_use]
    pub fn cores(&self) -> &BTreeSet<Core> {
        &self.cores
    }
}

impl Display for NumaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list = cpulist::emit(self.cores.iter().map(|core| core.id()));
        write!(f, "node {} (cores {list})", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cores(ids: &[u32]) -> BTreeSet<Core> {
        ids.iter().copied().map(Core::new).collect()
    }

    #[test]
    fn equality_considers_id_and_cores() {
        assert_eq!(
            NumaNode::new(0, cores(&[0, 1])),
            NumaNode::new(0, cores(&[0, 1]))
        );
        assert_ne!(
            NumaNode::new(0, cores(&[0, 1])),
            NumaNode::new(1, cores(&[0, 1]))
        );
        assert_ne!(
            NumaNode::new(0, cores(&[0, 1])),
            NumaNode::new(0, cores(&[0]))
        );
    }

    #[test]
    fn nodes_order_by_id_first() {
        assert!(NumaNode::new(0, cores(&[8, 9])) < NumaNode::new(1, cores(&[0])));
    }

    #[test]
    fn display_names_node_and_cores() {
        let node = NumaNode::new(1, cores(&[0, 1, 2, 5]));
        assert_eq!(format!("{node}"), "node 1 (cores 0-2,5)");
    }
}
