//! Fixed-size object pools that lend pre-constructed items out through RAII
//! handles, with slot arbitration done by a pluggable index allocator.
//!
//! A [`Pool`] owns `N` items for its whole life. [`Pool::take()`] borrows
//! one out as a [`PoolItem`]; dropping the handle resets the item and makes
//! its slot available again. Acquisition never blocks - an exhausted pool
//! simply produces an empty handle.
//!
//! Which slot a caller gets is decided by an [`Indexer`]. Two are provided:
//!
//! * [`MutexIndexer`] - the straightforward reference implementation, one
//!   lock around an index stack. The default.
//! * [`ConcurrentIndexer`] - the lock-free implementation, built on a ring
//!   of atomic cells and two cursors. The right choice when many threads
//!   hammer one pool.
//!
//! # Quick start
//!
//! ```
//! use slot_pool::{ConcurrentIndexer, RuntimePool};
//!
//! // Four buffers, shared by however many threads care to take them.
//! let pool: RuntimePool<Vec<u8>, ConcurrentIndexer> =
//!     RuntimePool::with_reset(4, Vec::clear);
//!
//! let mut buffer = pool.take();
//! assert!(!buffer.is_empty());
//! buffer.get_mut().extend_from_slice(b"scratch space");
//!
//! // Dropping the handle clears the buffer and hands the slot back.
//! drop(buffer);
//! ```

mod concurrent_indexer;
mod index_holder;
mod indexer;
mod mutex_indexer;
mod pool;
mod pool_item;

pub use concurrent_indexer::*;
pub use index_holder::*;
pub use indexer::*;
pub use mutex_indexer::*;
pub use pool::*;
pub use pool_item::PoolItem;
