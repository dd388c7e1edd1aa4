use std::cell::UnsafeCell;
use std::fmt;

use crate::pool_item::ReleaseSlot;
use crate::{Indexer, MutexIndexer, PoolItem};

/// One slot of a pool's backing store.
///
/// Interior mutability here is what lets `Pool::take()` lend out exclusive
/// item access through a shared pool reference; it is sound because the
/// pool's indexer hands each slot index to at most one holder at a time.
#[derive(Debug, Default)]
pub struct SlotCell<T>(UnsafeCell<T>);

impl<T> SlotCell<T> {
    fn new(value: T) -> Self {
        Self(UnsafeCell::new(value))
    }

    fn as_ptr(&self) -> *mut T {
        self.0.get()
    }
}

// SAFETY: The cell contents are only ever referenced by the single holder of
// the cell's slot index, so sharing the cell across threads hands the T to at
// most one thread at a time. That requires T: Send, nothing more.
unsafe impl<T: Send> Sync for SlotCell<T> {}

/// In-place state reset, invoked on an item at the moment its slot is handed
/// back to the pool.
///
/// Types that carry per-use state (buffers, accumulators, ...) implement
/// this so the next borrower starts from a clean slate. Pools constructed
/// with [`new_resetting`][RuntimePool::new_resetting] wire it up; the other
/// constructors use a no-op or a caller-supplied closure instead.
pub trait Reset {
    /// Returns the value to its ready-for-reuse state.
    fn reset(&mut self);
}

/// A fixed-size pool lending out pre-constructed items one at a time.
///
/// The pool constructs its `capacity` items once, up front, and never again:
/// [`take()`][Self::take] lends an existing item out and the returned
/// [`PoolItem`] hands it back on drop, after applying the pool's reset
/// policy. Items never move for the whole life of the pool, so borrowers can
/// hold plain references.
///
/// Taking is non-blocking. An exhausted pool produces an empty handle, never
/// an error and never a wait.
///
/// The two usable flavors are the aliases [`RuntimePool`] (size chosen at
/// construction) and [`StaticPool`] (size in the type); both share this one
/// implementation. The `I` parameter selects the concurrency behavior:
/// the default [`MutexIndexer`] or the lock-free
/// [`ConcurrentIndexer`][crate::ConcurrentIndexer].
///
/// # Example
///
/// ```
/// use slot_pool::RuntimePool;
///
/// let pool: RuntimePool<Vec<u8>> = RuntimePool::new(2);
///
/// let mut first = pool.take();
/// first.get_mut().extend_from_slice(b"hello");
///
/// let second = pool.take();
/// assert!(!second.is_empty());
///
/// // Two items exist, so a third take comes back empty.
/// assert!(pool.take().is_empty());
///
/// drop(first);
/// assert!(!pool.take().is_empty());
/// ```
pub struct Pool<T: 'static, C, I = MutexIndexer> {
    items: C,
    indexer: I,
    reset: Box<dyn Fn(&mut T) + Send + Sync>,
}

/// A [`Pool`] whose size is chosen at construction time.
pub type RuntimePool<T, I = MutexIndexer> = Pool<T, Box<[SlotCell<T>]>, I>;

/// A [`Pool`] whose size is part of the type.
pub type StaticPool<T, const N: usize, I = MutexIndexer> = Pool<T, [SlotCell<T>; N], I>;

impl<T, C, I> Pool<T, C, I>
where
    C: AsRef<[SlotCell<T>]>,
    I: Indexer,
{
    /// Lends out one item, or returns an empty handle when every item is
    /// already lent.
    ///
    /// Never blocks. Under heavy contention on a lock-free indexer this may
    /// transiently report empty even though a release is in flight.
    pub fn take(&self) -> PoolItem<'_, T> {
        let Some(index) = self.indexer.next().into_option() else {
            return PoolItem::empty();
        };

        let item = self.items.as_ref()[index].as_ptr();

        PoolItem::new(item, index, self)
    }

    /// The fixed number of items this pool owns, lent or not.
    #[expect(
        clippy::len_without_is_empty,
        reason = "the backing store size is fixed; emptiness is a take-time property, not a pool property"
    )]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.as_ref().len()
    }
}

impl<T, C, I> ReleaseSlot<T> for Pool<T, C, I>
where
    C: AsRef<[SlotCell<T>]>,
    I: Indexer,
{
    fn reset_and_release(&self, item: *mut T, index: usize) {
        // SAFETY: The index has not been released to the indexer yet, so the
        // dropping handle is still the sole referent of this slot.
        let item = unsafe { &mut *item };

        // Reset strictly before release: once the indexer can hand the index
        // out again, the item must already be clean.
        (self.reset)(item);
        self.indexer.release(index);
    }
}

impl<T, I> RuntimePool<T, I>
where
    T: Default,
    I: Indexer,
{
    /// Creates a pool of `capacity` default-constructed items with a no-op
    /// reset policy.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_reset(capacity, |_| {})
    }

    /// Creates a pool of `capacity` default-constructed items whose slots
    /// are passed to `reset` at hand-back time.
    #[must_use]
    pub fn with_reset(capacity: usize, reset: impl Fn(&mut T) + Send + Sync + 'static) -> Self {
        Self {
            items: (0..capacity).map(|_| SlotCell::new(T::default())).collect(),
            indexer: I::with_capacity(capacity),
            reset: Box::new(reset),
        }
    }
}

impl<T, I> RuntimePool<T, I>
where
    T: Default + Reset,
    I: Indexer,
{
    /// Creates a pool of `capacity` default-constructed items that are
    /// [`Reset`] at hand-back time.
    #[must_use]
    pub fn new_resetting(capacity: usize) -> Self {
        Self::with_reset(capacity, T::reset)
    }
}

impl<T, const N: usize, I> StaticPool<T, N, I>
where
    T: Default,
    I: Indexer,
{
    /// Creates a pool of `N` default-constructed items with a no-op reset
    /// policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_reset(|_| {})
    }

    /// Creates a pool of `N` default-constructed items whose slots are
    /// passed to `reset` at hand-back time.
    #[must_use]
    pub fn with_reset(reset: impl Fn(&mut T) + Send + Sync + 'static) -> Self {
        Self {
            items: std::array::from_fn(|_| SlotCell::new(T::default())),
            indexer: I::with_capacity(N),
            reset: Box::new(reset),
        }
    }
}

impl<T, const N: usize, I> StaticPool<T, N, I>
where
    T: Default + Reset,
    I: Indexer,
{
    /// Creates a pool of `N` default-constructed items that are [`Reset`]
    /// at hand-back time.
    #[must_use]
    pub fn new_resetting() -> Self {
        Self::with_reset(T::reset)
    }
}

impl<T, const N: usize, I> Default for StaticPool<T, N, I>
where
    T: Default,
    I: Indexer,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C, I> fmt::Debug for Pool<T, C, I>
where
    C: AsRef<[SlotCell<T>]>,
    I: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("len", &self.items.as_ref().len())
            .field("indexer", &self.indexer)
            .finish_non_exhaustive()
    }
}
