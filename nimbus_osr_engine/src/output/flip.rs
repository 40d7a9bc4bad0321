/// FlipNotifier trait - producer-to-consumer flip channel
///
/// When a frame's GPU work completes, the swap chain notifies the
/// external consumer with a transferable handle to the finished buffer.
/// The consumer acknowledges by invoking the completion callback exactly
/// once, at any later time; only then does the chain promote the buffer
/// to displayed and recycle its predecessor.
///
/// Transport is single-handle-per-call: the handle for the flipped
/// buffer is re-exported on every flip, and `new_buffer_identity` tells
/// the consumer whether it can skip re-importing a handle it has already
/// mapped.

use crate::gfx::Rect;
use crate::gpu::BufferHandle;

/// Acknowledgment callback handed to the consumer with each flip
pub type FlipAckCallback = Box<dyn FnOnce() + Send + 'static>;

/// Consumer-facing flip notification channel
pub trait FlipNotifier: Send + Sync {
    /// Announce a finished buffer to the consumer
    ///
    /// # Arguments
    ///
    /// * `handle` - transferable handle to the flipped buffer (never null;
    ///   the chain short-circuits null handles internally)
    /// * `damage` - sub-rectangle that changed since the previous flip
    /// * `new_buffer_identity` - false when `handle` refers to the same
    ///   buffer as a previous flip and the consumer may reuse its mapping
    /// * `done` - must be invoked exactly once when the consumer no longer
    ///   reads the previously displayed buffer
    fn on_after_flip(
        &self,
        handle: BufferHandle,
        damage: Rect,
        new_buffer_identity: bool,
        done: FlipAckCallback,
    );
}
