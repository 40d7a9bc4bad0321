/// GpuContext trait - the GPU command/context boundary
///
/// Thin, object-safe view of the primitives the swap chain needs:
/// texture and framebuffer names, importing a memory buffer as a GPU
/// image, binding the image to a texture, and sync tokens with
/// asynchronous completion callbacks. Implementations are free to batch
/// or proxy these calls; the swap chain only relies on the documented
/// ordering of sync-token signals.

use crate::error::NimbusResult;
use crate::gfx::{ColorSpace, Size};
use crate::gpu::MemoryBuffer;

/// GPU texture name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Imported GPU image identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

/// Framebuffer object identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FramebufferId(pub u32);

/// Opaque marker whose signal means previously issued GPU work finished
///
/// Tokens issued by one context signal in issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyncToken(pub u64);

/// Completion callback registered on a sync token
pub type SyncCallback = Box<dyn FnOnce() + Send + 'static>;

/// GPU command/context interface
///
/// All methods take `&self`: contexts are shared (`Arc<dyn GpuContext>`)
/// between the swap chain and its surfaces, and implementations use
/// interior mutability for their own bookkeeping.
pub trait GpuContext: Send + Sync {
    /// Largest texture dimension the platform supports
    ///
    /// Requested surface sizes are clamped to this before allocation.
    fn max_texture_size(&self) -> u32;

    /// Generate a framebuffer object name
    fn create_framebuffer(&self) -> FramebufferId;

    /// Delete a framebuffer object
    fn destroy_framebuffer(&self, fbo: FramebufferId);

    /// Make a framebuffer the current render target
    fn bind_framebuffer(&self, fbo: FramebufferId);

    /// Generate a texture name (no storage attached yet)
    fn create_texture(&self) -> TextureId;

    /// Delete a texture name
    fn delete_texture(&self, texture: TextureId);

    /// Import a memory buffer as a GPU image
    ///
    /// # Errors
    ///
    /// Returns `NimbusError::ImportFailed` if the buffer cannot be wrapped
    /// (unsupported format, exhausted image names, dead transport). The
    /// caller releases the buffer immediately in that case.
    fn import_image(&self, buffer: &dyn MemoryBuffer, size: Size) -> NimbusResult<ImageId>;

    /// Destroy an imported image
    fn destroy_image(&self, image: ImageId);

    /// Attach an imported image as the storage of a texture
    fn bind_texture_image(&self, texture: TextureId, image: ImageId);

    /// Detach an image from a texture without deleting either
    fn release_texture_image(&self, texture: TextureId, image: ImageId);

    /// Tag a texture with color-space metadata
    fn set_color_space_metadata(&self, texture: TextureId, color_space: ColorSpace);

    /// Attach a texture to the color slot of a framebuffer
    fn attach_framebuffer_texture(&self, fbo: FramebufferId, texture: TextureId);

    /// Flush pending GPU commands
    fn flush(&self);

    /// Insert a sync token after all commands issued so far
    fn insert_sync_token(&self) -> SyncToken;

    /// Register a completion callback on a sync token
    ///
    /// The callback is invoked exactly once, asynchronously, on the
    /// embedder's GPU-submission task queue, after the work preceding the
    /// token completes. Callbacks for tokens from one context fire in
    /// token-issue order.
    fn signal_sync_token(&self, token: SyncToken, callback: SyncCallback);
}
