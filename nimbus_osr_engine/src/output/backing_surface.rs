/// BackingSurface - one GPU-backed drawable unit
///
/// Owns a memory buffer from the external allocator, the GPU image
/// imported from it, and a reserved texture name. A surface is either
/// fully constructed (buffer + image + texture present) or it does not
/// exist: `allocate` returns an error instead of a partial surface, and
/// `Drop` guards every teardown step so a half-built surface abandoned
/// mid-construction is still destroyed safely.

use std::sync::Arc;

use crate::error::NimbusResult;
use crate::gfx::{ColorSpace, Size};
use crate::gpu::{
    BufferFormat, BufferHandle, BufferUsage, FramebufferId, GpuContext, ImageId,
    MemoryBuffer, MemoryBufferAllocator, TextureId,
};
use crate::osr_warn;

const SOURCE: &str = "nimbus::BackingSurface";

/// A single drawable surface owned by the pool
pub struct BackingSurface {
    gpu: Arc<dyn GpuContext>,
    size: Size,
    color_space: ColorSpace,
    buffer: Option<Box<dyn MemoryBuffer>>,
    image: Option<ImageId>,
    texture: Option<TextureId>,
    /// Framebuffer this surface is currently attached to, if bound
    bound_fbo: Option<FramebufferId>,
}

impl BackingSurface {
    /// Allocate a surface of the given size and color space
    ///
    /// Requests a scanout-capable memory buffer from the external
    /// allocator, tags it with the color space, imports it as a GPU
    /// image, and reserves a texture name (no storage is attached until
    /// the first bind).
    ///
    /// # Errors
    ///
    /// `AllocationFailed` when the allocator refuses the request,
    /// `ImportFailed` when the GPU cannot wrap the buffer (the buffer is
    /// released immediately). Both are logged and non-fatal.
    pub fn allocate(
        gpu: Arc<dyn GpuContext>,
        allocator: &dyn MemoryBufferAllocator,
        size: Size,
        color_space: ColorSpace,
    ) -> NimbusResult<Self> {
        let mut buffer = allocator
            .allocate_buffer(
                size,
                BufferFormat::Rgba8888,
                BufferUsage::SCANOUT | BufferUsage::GPU_READ,
            )
            .map_err(|e| {
                osr_warn!(SOURCE, "failed to allocate a {}x{} memory buffer: {}",
                    size.width, size.height, e);
                e
            })?;
        buffer.set_color_space(color_space);

        let image = gpu.import_image(buffer.as_ref(), size).map_err(|e| {
            // Dropping the buffer here releases it back to the allocator.
            osr_warn!(SOURCE, "could not import buffer as GPU image: {}", e);
            e
        })?;

        let texture = gpu.create_texture();

        Ok(Self {
            gpu,
            size,
            color_space,
            buffer: Some(buffer),
            image: Some(image),
            texture: Some(texture),
            bound_fbo: None,
        })
    }

    /// Attach this surface as the color target of `fbo`
    ///
    /// Idempotent while already bound to the same framebuffer: multi-pass
    /// rendering into one logical frame re-binds the framebuffer and
    /// nothing else. Binding to a *different* framebuffer while bound is
    /// a caller bug and panics.
    ///
    /// On first bind: imports the image into the texture, attaches the
    /// color-space metadata, and attaches the texture to the
    /// framebuffer's color slot.
    pub fn bind_as_render_target(&mut self, fbo: FramebufferId) {
        if let Some(bound) = self.bound_fbo {
            assert_eq!(
                bound, fbo,
                "surface is already bound to framebuffer {:?}, cannot bind {:?}",
                bound, fbo
            );
            self.gpu.bind_framebuffer(fbo);
            return;
        }

        let (Some(texture), Some(image)) = (self.texture, self.image) else {
            return;
        };

        self.gpu.bind_texture_image(texture, image);
        self.gpu.set_color_space_metadata(texture, self.color_space);
        self.gpu.bind_framebuffer(fbo);
        self.gpu.attach_framebuffer_texture(fbo, texture);
        self.bound_fbo = Some(fbo);
    }

    /// Detach the image from the texture and flush pending commands
    ///
    /// Safe to call any number of times; a no-op when not bound. The
    /// texture name survives for the next bind.
    pub fn release_render_target(&mut self) {
        if self.bound_fbo.is_none() {
            return;
        }
        let (Some(texture), Some(image)) = (self.texture, self.image) else {
            return;
        };

        self.gpu.release_texture_image(texture, image);
        self.gpu.flush();
        self.bound_fbo = None;
    }

    /// Clone a transferable handle to the underlying buffer
    ///
    /// Returns the null sentinel if the surface has no buffer.
    pub fn export_handle(&self) -> BufferHandle {
        self.buffer
            .as_ref()
            .map(|buffer| buffer.handle())
            .unwrap_or_else(BufferHandle::null)
    }

    /// Allocated size in pixels
    pub fn size(&self) -> Size {
        self.size
    }

    /// Color space the surface was allocated with
    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    /// Whether the surface currently owns a framebuffer attachment
    pub fn is_bound(&self) -> bool {
        self.bound_fbo.is_some()
    }
}

impl Drop for BackingSurface {
    fn drop(&mut self) {
        // Each step only runs if the corresponding resource exists, so
        // destroying a surface abandoned mid-construction is safe.
        if self.bound_fbo.is_some() {
            self.release_render_target();
        }
        if let Some(texture) = self.texture.take() {
            self.gpu.delete_texture(texture);
        }
        if let Some(image) = self.image.take() {
            self.gpu.destroy_image(image);
        }
        self.buffer.take();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "backing_surface_tests.rs"]
mod tests;
