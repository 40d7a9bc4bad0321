//! Software GPU context
//!
//! A no-hardware `GpuContext` that keeps name tables in hash maps and
//! completes sync tokens by posting their callbacks onto a shared task
//! queue. Pumping the queue from the demo loop plays the role of the
//! GPU finishing its work.

use std::sync::Mutex;

use rustc_hash::FxHashMap;

use nimbus_osr_engine::nimbus::gpu::{
    FramebufferId, GpuContext, ImageId, MemoryBuffer, SyncCallback, SyncToken, TextureId,
};
use nimbus_osr_engine::nimbus::{ColorSpace, Size, TaskQueue};
use nimbus_osr_engine::NimbusResult;

const MAX_TEXTURE_SIZE: u32 = 4096;

struct SoftwareGpuState {
    next_texture: u32,
    next_image: u32,
    next_fbo: u32,
    next_token: u64,
    bound_fbo: Option<FramebufferId>,
    images: FxHashMap<ImageId, Size>,
    texture_image: FxHashMap<TextureId, Option<ImageId>>,
    texture_color_space: FxHashMap<TextureId, ColorSpace>,
    fbo_attachment: FxHashMap<FramebufferId, Option<TextureId>>,
}

/// Hash-map-backed GPU context for the demo
pub struct SoftwareGpu {
    state: Mutex<SoftwareGpuState>,
    tasks: TaskQueue,
}

impl SoftwareGpu {
    /// Create a context completing sync tokens through `tasks`
    pub fn new(tasks: TaskQueue) -> Self {
        Self {
            state: Mutex::new(SoftwareGpuState {
                next_texture: 1,
                next_image: 1,
                next_fbo: 1,
                next_token: 1,
                bound_fbo: None,
                images: FxHashMap::default(),
                texture_image: FxHashMap::default(),
                texture_color_space: FxHashMap::default(),
                fbo_attachment: FxHashMap::default(),
            }),
            tasks,
        }
    }

    /// Number of live imported images
    pub fn image_count(&self) -> usize {
        self.state.lock().map(|s| s.images.len()).unwrap_or(0)
    }
}

impl GpuContext for SoftwareGpu {
    fn max_texture_size(&self) -> u32 {
        MAX_TEXTURE_SIZE
    }

    fn create_framebuffer(&self) -> FramebufferId {
        let mut state = self.state.lock().unwrap();
        let fbo = FramebufferId(state.next_fbo);
        state.next_fbo += 1;
        state.fbo_attachment.insert(fbo, None);
        fbo
    }

    fn destroy_framebuffer(&self, fbo: FramebufferId) {
        let mut state = self.state.lock().unwrap();
        state.fbo_attachment.remove(&fbo);
        if state.bound_fbo == Some(fbo) {
            state.bound_fbo = None;
        }
    }

    fn bind_framebuffer(&self, fbo: FramebufferId) {
        self.state.lock().unwrap().bound_fbo = Some(fbo);
    }

    fn create_texture(&self) -> TextureId {
        let mut state = self.state.lock().unwrap();
        let texture = TextureId(state.next_texture);
        state.next_texture += 1;
        state.texture_image.insert(texture, None);
        texture
    }

    fn delete_texture(&self, texture: TextureId) {
        let mut state = self.state.lock().unwrap();
        state.texture_image.remove(&texture);
        state.texture_color_space.remove(&texture);
    }

    fn import_image(&self, _buffer: &dyn MemoryBuffer, size: Size) -> NimbusResult<ImageId> {
        let mut state = self.state.lock().unwrap();
        let image = ImageId(state.next_image);
        state.next_image += 1;
        state.images.insert(image, size);
        Ok(image)
    }

    fn destroy_image(&self, image: ImageId) {
        self.state.lock().unwrap().images.remove(&image);
    }

    fn bind_texture_image(&self, texture: TextureId, image: ImageId) {
        let mut state = self.state.lock().unwrap();
        state.texture_image.insert(texture, Some(image));
    }

    fn release_texture_image(&self, texture: TextureId, _image: ImageId) {
        let mut state = self.state.lock().unwrap();
        state.texture_image.insert(texture, None);
    }

    fn set_color_space_metadata(&self, texture: TextureId, color_space: ColorSpace) {
        let mut state = self.state.lock().unwrap();
        state.texture_color_space.insert(texture, color_space);
    }

    fn attach_framebuffer_texture(&self, fbo: FramebufferId, texture: TextureId) {
        let mut state = self.state.lock().unwrap();
        state.fbo_attachment.insert(fbo, Some(texture));
    }

    fn flush(&self) {}

    fn insert_sync_token(&self) -> SyncToken {
        let mut state = self.state.lock().unwrap();
        let token = SyncToken(state.next_token);
        state.next_token += 1;
        token
    }

    fn signal_sync_token(&self, _token: SyncToken, callback: SyncCallback) {
        // Tokens are issued and signaled in the same order, so posting in
        // call order preserves the required signal ordering.
        self.tasks.post(callback);
    }
}
