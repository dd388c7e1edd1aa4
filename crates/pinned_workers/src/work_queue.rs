use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

/// Unbounded FIFO handing items from producers to blocking consumers.
///
/// Producers never block and wake one waiter per push; consumers block while
/// the queue is empty. One mutex, one condition variable, no priorities.
#[derive(Debug)]
pub(crate) struct WorkQueue<T> {
    items: Mutex<VecDeque<T>>,
    available: Condvar,
}

impl<T> WorkQueue<T> {
    pub(crate) fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }

    /// Appends an item and wakes one waiting consumer.
    pub(crate) fn push(&self, item: T) {
        let mut items = self.items.lock().expect("work queue lock poisoned");
        items.push_back(item);
        self.available.notify_one();
    }

    /// Removes and returns the oldest item, blocking while the queue is
    /// empty.
    pub(crate) fn take(&self) -> T {
        let mut items = self.items.lock().expect("work queue lock poisoned");

        loop {
            if let Some(item) = items.pop_front() {
                return item;
            }

            items = self
                .available
                .wait(items)
                .expect("work queue lock poisoned");
        }
    }

    /// Whether any item is waiting to be taken.
    pub(crate) fn has_work(&self) -> bool {
        !self
            .items
            .lock()
            .expect("work queue lock poisoned")
            .is_empty()
    }
}
