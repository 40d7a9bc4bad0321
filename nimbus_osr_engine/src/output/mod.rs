//! Offscreen output surfaces
//!
//! The heart of the engine: a swap chain that renders composited frames
//! into pooled GPU memory buffers and hands them to an external consumer
//! instead of presenting to a window.
//!
//! - `OutputSurface` is the capability set shared by every output-surface
//!   variant (on-screen, offscreen, different buffering strategies).
//! - `BackingSurface` is one drawable unit: a memory buffer, its imported
//!   GPU image, and an optional texture binding.
//! - `SurfacePool` owns the surfaces and tracks the occupancy lifecycle
//!   (free, rendering, in flight, displayed, retired).
//! - `ExternalOutputSurface` orchestrates the per-frame protocol:
//!   bind, submit, GPU sync, flip notification, acknowledgment, recycle.

pub mod backing_surface;
pub mod external_surface;
pub mod flip;
pub mod output_surface;
pub mod surface_pool;

pub use backing_surface::BackingSurface;
pub use external_surface::ExternalOutputSurface;
pub use flip::{FlipAckCallback, FlipNotifier};
pub use output_surface::{
    LatencyInfo, OutputFrame, OutputSurface, OutputSurfaceClient, PresentationFeedback,
    ReshapeParams, SwapTimings,
};
pub use surface_pool::{SurfaceKey, SurfacePool, SurfaceState};
