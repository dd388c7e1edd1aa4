use crate::IndexHolder;

/// Arbitrates the slot indices `0..capacity` among callers.
///
/// An index is either *handed out* (some caller obtained it from [`next()`][1]
/// and has not yet passed it to [`release()`][2]) or *free*. Implementations
/// guarantee that a handed-out index is held by at most one caller at a time;
/// this is the entire concurrency contract a [`Pool`][crate::Pool] needs from
/// its indexer.
///
/// Acquisition never blocks: when no index is free - or, for lock-free
/// implementations, transiently under extreme contention - `next()` reports
/// empty and the caller decides what to do about it.
///
/// [1]: Indexer::next
/// [2]: Indexer::release
pub trait Indexer: Send + Sync {
    /// Creates an indexer arbitrating the indices `0..capacity`.
    fn with_capacity(capacity: usize) -> Self
    where
        Self: Sized;

    /// Takes a free index out of the indexer, or reports empty.
    fn next(&self) -> IndexHolder;

    /// Makes a previously handed-out index available again.
    ///
    /// Releasing an index that was never handed out, or releasing the same
    /// index twice, is a caller error that implementations do not detect
    /// (debug builds assert what they cheaply can).
    fn release(&self, index: usize);
}
