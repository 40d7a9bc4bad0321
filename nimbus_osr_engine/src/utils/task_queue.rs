/// Cooperative single-threaded task queue.
///
/// The swap chain never blocks on GPU completion or consumer
/// acknowledgment; both arrive as continuations scheduled onto a queue
/// that the embedding host pumps on its GPU-submission thread. All
/// continuations for one chain run on that one logical thread, so the
/// chain itself needs no locking beyond what the queue provides.
///
/// Tasks run strictly in posting order. A task may post further tasks;
/// they run after everything already queued.
///
/// # Example
///
/// ```
/// use nimbus_osr_engine::nimbus::TaskQueue;
///
/// let queue = TaskQueue::new();
/// let handle = queue.clone();
/// queue.post(move || handle.post(|| {}));
/// assert_eq!(queue.run_until_idle(), 2);
/// ```
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

type Task = Box<dyn FnOnce() + Send + 'static>;

/// Cloneable handle to a shared FIFO of pending continuations
#[derive(Clone)]
pub struct TaskQueue {
    inner: Arc<Mutex<VecDeque<Task>>>,
}

impl TaskQueue {
    /// Create a new empty queue
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Append a task to the back of the queue
    pub fn post<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Ok(mut tasks) = self.inner.lock() {
            tasks.push_back(Box::new(task));
        }
    }

    /// Run the frontmost task, if any
    ///
    /// The queue lock is released before the task runs, so tasks are free
    /// to post new tasks.
    pub fn run_one(&self) -> bool {
        let task = match self.inner.lock() {
            Ok(mut tasks) => tasks.pop_front(),
            Err(_) => None,
        };
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Run tasks until the queue is empty, including tasks posted while
    /// draining. Returns how many tasks ran.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while self.run_one() {
            ran += 1;
        }
        ran
    }

    /// Number of currently queued tasks
    pub fn len(&self) -> usize {
        self.inner.lock().map(|tasks| tasks.len()).unwrap_or(0)
    }

    /// Whether no tasks are queued
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "task_queue_tests.rs"]
mod tests;
