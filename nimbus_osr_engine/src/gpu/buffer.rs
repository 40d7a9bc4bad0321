/// Memory-buffer allocator boundary
///
/// Backing surfaces draw into GPU-importable memory buffers obtained from
/// an external allocator (shared memory, dma-buf, IOSurface, DXGI - the
/// swap chain does not care which). A buffer exposes a clonable
/// transferable handle that crosses the process boundary to the consumer.

use bitflags::bitflags;
use crate::error::NimbusResult;
use crate::gfx::{ColorSpace, Size};

bitflags! {
    /// Intended usage of an allocated buffer
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BufferUsage: u32 {
        /// Buffer may be handed to a display/scanout consumer
        const SCANOUT = 1 << 0;
        /// GPU reads the buffer (texture sampling)
        const GPU_READ = 1 << 1;
        /// CPU maps the buffer for reading
        const CPU_READ = 1 << 2;
    }
}

/// Pixel format of an allocated buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferFormat {
    /// 8-bit RGBA (the composited-output default)
    #[default]
    Rgba8888,

    /// 8-bit BGRA
    Bgra8888,
}

impl BufferFormat {
    /// Bytes per pixel for this format
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            BufferFormat::Rgba8888 | BufferFormat::Bgra8888 => 4,
        }
    }
}

/// Transferable handle to a memory buffer
///
/// Cloned out of a buffer for the cross-process flip hand-off. The null
/// handle is the sentinel for "no real cross-process buffer"; the swap
/// chain skips the consumer round-trip when it sees one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle {
    /// Allocator-scoped buffer identity (0 = null)
    pub id: u64,
}

impl BufferHandle {
    /// The empty sentinel handle
    pub fn null() -> Self {
        Self { id: 0 }
    }

    /// Whether this is the empty sentinel
    pub fn is_null(&self) -> bool {
        self.id == 0
    }
}

/// A GPU-importable memory buffer owned by a backing surface
pub trait MemoryBuffer: Send {
    /// Clone the transferable handle to this buffer
    fn handle(&self) -> BufferHandle;

    /// Attach color-space metadata to the buffer
    fn set_color_space(&mut self, color_space: ColorSpace);

    /// Allocated size in pixels
    fn size(&self) -> Size;

    /// Pixel format
    fn format(&self) -> BufferFormat;
}

/// External allocator for GPU-importable memory buffers
pub trait MemoryBufferAllocator: Send + Sync {
    /// Allocate a buffer of the given size, format, and usage
    ///
    /// # Errors
    ///
    /// Returns `NimbusError::AllocationFailed` when the allocator refuses
    /// or cannot satisfy the request. This is never fatal to the swap
    /// chain; the frame is simply skipped and the caller retries later.
    fn allocate_buffer(
        &self,
        size: Size,
        format: BufferFormat,
        usage: BufferUsage,
    ) -> NimbusResult<Box<dyn MemoryBuffer>>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
