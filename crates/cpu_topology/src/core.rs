use std::fmt::{self, Display};

/// A processor core identifier, matching the numeric identifier used by the
/// standard tooling of the operating system.
///
/// Values are not guaranteed to be sequential or contiguous, nor to start
/// from zero.
pub type CoreId = u32;

/// One schedulable processor core.
///
/// Cores are plain identities: two of them are equal when their IDs are
/// equal, and they order by ID. They are cheap to copy and carry no
/// platform handles.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Core {
    id: CoreId,
}

impl Core {
    /// Creates a core identity from an operating system core ID.
    #[must_use]
    pub const fn new(id: CoreId) -> Self {
        Self { id }
    }

    /// The operating system identifier of this core.
    #[must_use]
    pub const fn id(self) -> CoreId {
        self.id
    }
}

impl From<CoreId> for Core {
    fn from(id: CoreId) -> Self {
        Self::new(id)
    }
}

impl Display for Core {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "core {}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Core: Copy, Send, Sync);

    #[test]
    fn identity_is_the_id() {
        assert_eq!(Core::new(3), Core::new(3));
        assert_ne!(Core::new(3), Core::new(4));
        assert!(Core::new(3) < Core::new(4));
        assert_eq!(Core::from(7).id(), 7);
    }

    #[test]
    fn equal_cores_hash_equally() {
        let mut hasher1 = DefaultHasher::new();
        Core::new(42).hash(&mut hasher1);

        let mut hasher2 = DefaultHasher::new();
        Core::new(42).hash(&mut hasher2);

        assert_eq!(hasher1.finish(), hasher2.finish());
    }

    #[test]
    fn display_names_the_core() {
        assert_eq!(format!("{}", Core::new(12)), "core 12");
    }
}
