//! Software memory buffers
//!
//! CPU-side pixel buffers standing in for the shared-memory or dma-buf
//! allocations a real embedder would provide. Each buffer owns its pixel
//! storage and is cleared to a recognizable color at allocation time so
//! a consumer mapping the "shared" memory would see something.

use std::sync::atomic::{AtomicU64, Ordering};

use nimbus_osr_engine::nimbus::gpu::{
    BufferFormat, BufferHandle, BufferUsage, MemoryBuffer, MemoryBufferAllocator,
};
use nimbus_osr_engine::nimbus::{ColorSpace, Size};
use nimbus_osr_engine::{osr_debug, NimbusResult};

/// CPU pixel buffer with a process-unique handle
pub struct SoftwareBuffer {
    handle: BufferHandle,
    size: Size,
    format: BufferFormat,
    color_space: ColorSpace,
    pixels: Vec<u8>,
}

impl SoftwareBuffer {
    /// Fill the whole buffer with one packed pixel value
    pub fn clear(&mut self, pixel: u32) {
        let pixels: &mut [u32] = bytemuck::cast_slice_mut(&mut self.pixels);
        pixels.fill(pixel);
    }
}

impl MemoryBuffer for SoftwareBuffer {
    fn handle(&self) -> BufferHandle {
        self.handle
    }

    fn set_color_space(&mut self, color_space: ColorSpace) {
        if color_space != self.color_space {
            osr_debug!(
                "nimbus_demo",
                "buffer {} tagged {:?}",
                self.handle.id,
                color_space
            );
        }
        self.color_space = color_space;
    }

    fn size(&self) -> Size {
        self.size
    }

    fn format(&self) -> BufferFormat {
        self.format
    }
}

/// Allocator handing out heap-backed buffers with sequential handles
///
/// Handles start at 1; 0 is the engine's null sentinel.
pub struct SoftwareAllocator {
    next_handle: AtomicU64,
}

impl SoftwareAllocator {
    pub fn new() -> Self {
        Self {
            next_handle: AtomicU64::new(1),
        }
    }
}

impl Default for SoftwareAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBufferAllocator for SoftwareAllocator {
    fn allocate_buffer(
        &self,
        size: Size,
        format: BufferFormat,
        _usage: BufferUsage,
    ) -> NimbusResult<Box<dyn MemoryBuffer>> {
        let byte_len = size.area() as usize * format.bytes_per_pixel() as usize;
        let id = self.next_handle.fetch_add(1, Ordering::Relaxed);

        let mut buffer = SoftwareBuffer {
            handle: BufferHandle { id },
            size,
            format,
            color_space: ColorSpace::default(),
            pixels: vec![0; byte_len],
        };

        // Opaque dark gray, so freshly allocated frames are visibly blank
        // rather than transparent garbage.
        buffer.clear(0xff20_2020);

        Ok(Box::new(buffer))
    }
}
