//! Internal utilities

mod task_queue;

pub use task_queue::TaskQueue;
