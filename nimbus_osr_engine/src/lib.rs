/*!
# Nimbus OSR Engine

Offscreen-rendering output surfaces for embedding composited browser
frames into a host application.

Instead of presenting to a native window, the engine renders each frame
into a pooled GPU memory buffer and hands a transferable handle to an
external consumer, recycling buffers once the consumer acknowledges
them. The hard part - and the core of this crate - is the swap-chain
state machine that pipelines rendering, GPU synchronization, the
cross-process flip, and the acknowledgment protocol without ever
overwriting a buffer still in flight.

## Architecture

- **OutputSurface**: capability set shared by all output-surface variants
- **ExternalOutputSurface**: the offscreen swap-chain controller
- **SurfacePool**: arena of backing surfaces with the occupancy lifecycle
- **BackingSurface**: one buffer + imported image + texture binding
- **GpuContext / MemoryBufferAllocator / FlipNotifier**: the external
  collaborator boundary, implemented by backends

Backends (a real command-buffer bridge, a software rasterizer, the test
mocks) implement the boundary traits; the engine contains no platform
code.
*/

// Internal modules (engine and log stay public: the logging macros
// expand to `$crate::engine::Engine` / `$crate::log::LogSeverity`)
pub mod error;
pub mod engine;
pub mod log;
pub mod gfx;
pub mod gpu;
pub mod output;
pub mod utils;

// Main nimbus namespace module
pub mod nimbus {
    // Error types
    pub use crate::error::{NimbusError as Error, NimbusResult as Result};

    // Logging entry point
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Geometry and color primitives
    pub use crate::gfx::{ColorSpace, Rect, Size};

    // GPU boundary traits
    pub mod gpu {
        pub use crate::gpu::*;
    }

    // Output-surface types
    pub mod output {
        pub use crate::output::*;
    }

    // Task queue for cooperative callback delivery
    pub use crate::utils::TaskQueue;
}

// Flat re-exports for direct use
pub use crate::error::{NimbusError, NimbusResult};
pub use crate::engine::Engine;
