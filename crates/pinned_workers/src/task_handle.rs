use std::sync::{Arc, Condvar, Mutex};
use std::thread;

/// Outcome slot shared between a submitted task and its [`TaskHandle`].
///
/// Fulfilled exactly once, by the worker that ran the task; the handle side
/// only ever waits and takes.
#[derive(Debug)]
pub(crate) struct Completion<R> {
    outcome: Mutex<Option<thread::Result<R>>>,
    done: Condvar,
}

impl<R> Completion<R> {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            outcome: Mutex::new(None),
            done: Condvar::new(),
        })
    }

    pub(crate) fn fulfill(&self, outcome: thread::Result<R>) {
        let mut slot = self.outcome.lock().expect("completion lock poisoned");
        *slot = Some(outcome);
        self.done.notify_all();
    }
}

/// Handle to the eventual outcome of a task submitted with
/// [`WorkerPool::submit_with_result()`][1].
///
/// [1]: crate::WorkerPool::submit_with_result
#[derive(Debug)]
pub struct TaskHandle<R> {
    completion: Arc<Completion<R>>,
}

impl<R> TaskHandle<R> {
    pub(crate) fn new(completion: Arc<Completion<R>>) -> Self {
        Self { completion }
    }

    /// Blocks until the task has run, then yields its outcome.
    ///
    /// A task that panicked surfaces here the same way a panicked thread
    /// surfaces from [`std::thread::JoinHandle::join`]: as `Err` carrying
    /// the panic payload.
    pub fn join(self) -> thread::Result<R> {
        let mut slot = self
            .completion
            .outcome
            .lock()
            .expect("completion lock poisoned");

        loop {
            if let Some(outcome) = slot.take() {
                return outcome;
            }

            slot = self
                .completion
                .done
                .wait(slot)
                .expect("completion lock poisoned");
        }
    }

    /// Whether the outcome is already available, without blocking.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.completion
            .outcome
            .lock()
            .expect("completion lock poisoned")
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn join_yields_the_fulfilled_value() {
        let completion = Completion::new();
        let handle = TaskHandle::new(Arc::clone(&completion));

        completion.fulfill(Ok(41));

        assert!(handle.is_finished());
        assert_eq!(handle.join().unwrap(), 41);
    }

    #[test]
    fn join_blocks_until_fulfillment() {
        let completion = Completion::new();
        let handle = TaskHandle::new(Arc::clone(&completion));

        let fulfiller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            completion.fulfill(Ok("late"));
        });

        assert_eq!(handle.join().unwrap(), "late");
        fulfiller.join().unwrap();
    }

    #[test]
    fn panic_payloads_come_through_as_err() {
        let completion = Completion::<()>::new();
        let handle = TaskHandle::new(Arc::clone(&completion));

        completion.fulfill(Err(Box::new("exploded")));

        let payload = handle.join().unwrap_err();
        assert_eq!(*payload.downcast::<&str>().unwrap(), "exploded");
    }
}
