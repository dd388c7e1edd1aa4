use std::fmt;
use std::ptr;

/// The part of a pool a handle needs for giving its slot back: reset the
/// item, then make the index available again, in that order.
pub(crate) trait ReleaseSlot<T> {
    fn reset_and_release(&self, item: *mut T, index: usize);
}

/// Exclusive handle to one pool slot.
///
/// A non-empty handle grants exclusive access to the `T` in its slot for as
/// long as the handle lives. Dropping it resets the item and returns the
/// index to the pool, exactly once; an empty handle (the pool had nothing to
/// lend) releases nothing on drop.
///
/// Handles move but do not clone: ownership of the release obligation
/// transfers with the value, so there is no way to end up releasing a slot
/// twice. Because a handle borrows its pool, the pool can neither move nor
/// be dropped while any handle is outstanding - the items stay put for the
/// whole lending period.
pub struct PoolItem<'p, T> {
    item: *mut T,
    index: usize,
    pool: Option<&'p dyn ReleaseSlot<T>>,
}

impl<'p, T> PoolItem<'p, T> {
    pub(crate) fn new(item: *mut T, index: usize, pool: &'p dyn ReleaseSlot<T>) -> Self {
        Self {
            item,
            index,
            pool: Some(pool),
        }
    }

    pub(crate) fn empty() -> Self {
        Self {
            item: ptr::null_mut(),
            index: 0,
            pool: None,
        }
    }

    /// Whether this handle holds no slot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pool.is_none()
    }

    /// The lent item.
    ///
    /// # Panics
    ///
    /// Panics when the handle is empty; check [`is_empty()`][Self::is_empty]
    /// first.
    #[must_use]
    pub fn get(&self) -> &T {
        assert!(!self.is_empty(), "no slot is held");

        // SAFETY: A non-empty handle is the only referent of its slot (the
        // indexer hands each index to one caller at a time) and the pool the
        // slot lives in outlives 'p.
        unsafe { &*self.item }
    }

    /// The lent item, exclusively.
    ///
    /// # Panics
    ///
    /// Panics when the handle is empty; check [`is_empty()`][Self::is_empty]
    /// first.
    #[must_use]
    pub fn get_mut(&mut self) -> &mut T {
        assert!(!self.is_empty(), "no slot is held");

        // SAFETY: As in get(), plus the exclusive borrow of the handle makes
        // this the only live reference.
        unsafe { &mut *self.item }
    }

    /// The index of the held slot within its pool.
    ///
    /// # Panics
    ///
    /// Panics when the handle is empty; check [`is_empty()`][Self::is_empty]
    /// first.
    #[must_use]
    pub fn pool_index(&self) -> usize {
        assert!(!self.is_empty(), "no slot is held");

        self.index
    }
}

impl<T> Drop for PoolItem<'_, T> {
    fn drop(&mut self) {
        if let Some(pool) = self.pool.take() {
            pool.reset_and_release(self.item, self.index);
        }
    }
}

impl<T> fmt::Debug for PoolItem<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolItem")
            .field("is_empty", &self.is_empty())
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Counts releases instead of talking to a real pool.
    struct CountingRelease {
        releases: Cell<u32>,
        last_index: Cell<Option<usize>>,
    }

    impl CountingRelease {
        fn new() -> Self {
            Self {
                releases: Cell::new(0),
                last_index: Cell::new(None),
            }
        }
    }

    impl ReleaseSlot<u32> for CountingRelease {
        fn reset_and_release(&self, _item: *mut u32, index: usize) {
            self.releases.set(self.releases.get() + 1);
            self.last_index.set(Some(index));
        }
    }

    #[test]
    fn drop_releases_exactly_once() {
        let site = CountingRelease::new();
        let mut value = 7_u32;

        {
            let item = PoolItem::new(&raw mut value, 3, &site);
            assert!(!item.is_empty());
            assert_eq!(item.pool_index(), 3);
        }

        assert_eq!(site.releases.get(), 1);
        assert_eq!(site.last_index.get(), Some(3));
    }

    #[test]
    fn moving_does_not_duplicate_the_release() {
        let site = CountingRelease::new();
        let mut value = 7_u32;

        fn consume(item: PoolItem<'_, u32>) {
            assert_eq!(*item.get(), 7);
        }

        let item = PoolItem::new(&raw mut value, 0, &site);
        consume(item);

        assert_eq!(site.releases.get(), 1);
    }

    #[test]
    fn empty_handle_releases_nothing() {
        {
            let item = PoolItem::<u32>::empty();
            assert!(item.is_empty());
        }
        // Nothing to observe: an empty handle has no release site at all.
    }

    #[test]
    fn get_reads_and_get_mut_writes() {
        let site = CountingRelease::new();
        let mut value = 1_u32;

        let mut item = PoolItem::new(&raw mut value, 0, &site);
        *item.get_mut() = 9;
        assert_eq!(*item.get(), 9);
    }

    #[test]
    #[should_panic(expected = "no slot is held")]
    fn get_on_empty_panics() {
        let item = PoolItem::<u32>::empty();
        let _ = item.get();
    }

    #[test]
    #[should_panic(expected = "no slot is held")]
    fn pool_index_on_empty_panics() {
        let item = PoolItem::<u32>::empty();
        let _ = item.pool_index();
    }
}
