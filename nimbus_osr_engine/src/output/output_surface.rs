/// OutputSurface trait - the polymorphic output-surface contract
///
/// Every output-surface variant (the offscreen external swap chain here,
/// an on-screen presenter elsewhere) exposes the same five operations.
/// Callers drive them from a single logical GPU-submission thread;
/// completion of a submitted frame arrives later through the
/// `OutputSurfaceClient` callbacks.

use std::time::{Duration, Instant};

use crate::error::NimbusResult;
use crate::gfx::{ColorSpace, Rect, Size};
use crate::gpu::BufferFormat;

/// Opaque latency marker carried through the frame pipeline
///
/// Attached to a submitted frame and handed back, untouched, with the
/// swap acknowledgment once the consumer is done with the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyInfo {
    /// Host-assigned trace identifier
    pub trace_id: u64,
}

/// Target parameters for `OutputSurface::reshape`
///
/// Only `size` and `color_space` are distinguishing state: a reshape
/// whose size and color space match the current ones is a complete
/// no-op even if the other fields differ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReshapeParams {
    pub size: Size,
    pub scale_factor: f32,
    pub color_space: ColorSpace,
    pub format: BufferFormat,
    pub use_stencil: bool,
}

impl ReshapeParams {
    /// Reshape to a size with default scale, color space, and format
    pub fn with_size(size: Size) -> Self {
        Self {
            size,
            scale_factor: 1.0,
            color_space: ColorSpace::default(),
            format: BufferFormat::default(),
            use_stencil: false,
        }
    }
}

/// Metadata submitted with a finished frame
#[derive(Debug, Clone)]
pub struct OutputFrame {
    /// Size of the submitted frame; must match the current surface size
    pub size: Size,

    /// Sub-rectangle that changed since the previous flip
    pub damage: Rect,

    /// Latency markers returned with the swap acknowledgment
    pub latency: Vec<LatencyInfo>,
}

impl OutputFrame {
    /// A frame damaging the whole surface, with no latency markers
    pub fn new(size: Size) -> Self {
        Self {
            size,
            damage: Rect::from_size(size),
            latency: Vec::new(),
        }
    }
}

/// Timing information synthesized for a completed swap
///
/// Offscreen output has no real display swap, so `swap_start` is an
/// approximation taken when the consumer acknowledged the frame.
#[derive(Debug, Clone, Copy)]
pub struct SwapTimings {
    pub swap_start: Instant,
}

/// Synthesized presentation feedback for a completed frame
#[derive(Debug, Clone, Copy)]
pub struct PresentationFeedback {
    /// Approximate presentation time (acknowledgment time)
    pub timestamp: Instant,

    /// Nominal refresh interval reported to the renderer
    pub interval: Duration,

    /// Feedback flags (always 0 for offscreen output)
    pub flags: u32,
}

/// Renderer-facing sink for frame-completion telemetry
pub trait OutputSurfaceClient: Send {
    /// A submitted frame finished its full hand-off cycle
    fn did_receive_swap_ack(&mut self, timings: SwapTimings, latency: Vec<LatencyInfo>);

    /// Presentation feedback for the same frame (approximate timestamp)
    fn did_receive_presentation_feedback(&mut self, feedback: PresentationFeedback);

    /// The size the acknowledged frame was swapped at
    ///
    /// Only delivered when the chain was configured to send size
    /// notifications.
    fn did_swap_with_size(&mut self, size: Size);
}

/// Capability set shared by all output-surface variants
pub trait OutputSurface {
    /// Lazily allocate a backbuffer for the current size
    ///
    /// No-op if the size is empty or a backbuffer is already reserved.
    ///
    /// # Errors
    ///
    /// `AllocationFailed`/`ImportFailed` when a new surface was needed and
    /// could not be constructed. Non-fatal; retry on the next bind.
    fn ensure_backbuffer(&mut self) -> NimbusResult<()>;

    /// Tear down every surface, the shared framebuffer, and all queues
    ///
    /// Outstanding async callbacks become silent no-ops.
    fn discard_backbuffer(&mut self);

    /// Enter (or continue) rendering into the current backbuffer
    ///
    /// Idempotent while a backbuffer is bound: repeated calls with no
    /// intervening submit re-bind the same surface and framebuffer.
    ///
    /// # Errors
    ///
    /// `NoSurfaceAvailable` (logged) when the target size is empty or no
    /// surface could be acquired. No side effects in that case.
    fn bind_framebuffer(&mut self) -> NimbusResult<()>;

    /// Change target size/color space
    ///
    /// Discards and reallocates all surfaces only if size or color space
    /// actually differ; otherwise a complete no-op.
    fn reshape(&mut self, params: &ReshapeParams);

    /// Submit the rendered frame and start the asynchronous hand-off
    ///
    /// Returns immediately; the flip and acknowledgment happen later via
    /// chained callbacks.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` if no surface is currently being rendered into.
    fn submit_frame(&mut self, frame: OutputFrame) -> NimbusResult<()>;
}
