/// Mock GPU backend for unit tests (no GPU required)
///
/// Implements the `GpuContext` and `MemoryBufferAllocator` traits with
/// pure bookkeeping: ids are counters, operations are recorded as
/// strings, and sync-token callbacks are deferred onto a `TaskQueue` the
/// test pumps explicitly. Failure injection covers the allocator
/// (refuse the next N requests), the image import, and the null-handle
/// sentinel path.

use std::sync::Mutex;

use crate::error::{NimbusError, NimbusResult};
use crate::gfx::{ColorSpace, Size};
use crate::gpu::{
    BufferFormat, BufferHandle, BufferUsage, FramebufferId, GpuContext, ImageId,
    MemoryBuffer, MemoryBufferAllocator, SyncCallback, SyncToken, TextureId,
};
use crate::utils::TaskQueue;

// ============================================================================
// Mock GPU context
// ============================================================================

struct MockGpuState {
    next_id: u32,
    next_token: u64,
    ops: Vec<String>,
    live_textures: usize,
    live_images: usize,
    live_framebuffers: usize,
    fail_import: bool,
    max_texture_size: u32,
}

/// Recording GpuContext that defers sync signals onto a TaskQueue
pub struct MockGpuContext {
    tasks: TaskQueue,
    state: Mutex<MockGpuState>,
}

impl MockGpuContext {
    pub fn new(tasks: TaskQueue) -> Self {
        Self {
            tasks,
            state: Mutex::new(MockGpuState {
                next_id: 1,
                next_token: 1,
                ops: Vec::new(),
                live_textures: 0,
                live_images: 0,
                live_framebuffers: 0,
                fail_import: false,
                max_texture_size: 8192,
            }),
        }
    }

    /// Make subsequent import_image calls fail
    pub fn set_fail_import(&self, fail: bool) {
        self.state.lock().unwrap().fail_import = fail;
    }

    /// Override the reported maximum texture size
    pub fn set_max_texture_size(&self, max: u32) {
        self.state.lock().unwrap().max_texture_size = max;
    }

    /// Every operation recorded so far, in issue order
    pub fn ops(&self) -> Vec<String> {
        self.state.lock().unwrap().ops.clone()
    }

    pub fn live_texture_count(&self) -> usize {
        self.state.lock().unwrap().live_textures
    }

    pub fn live_image_count(&self) -> usize {
        self.state.lock().unwrap().live_images
    }

    pub fn live_framebuffer_count(&self) -> usize {
        self.state.lock().unwrap().live_framebuffers
    }

    fn record(&self, op: String) {
        self.state.lock().unwrap().ops.push(op);
    }

    fn next_id(&self) -> u32 {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        id
    }
}

impl GpuContext for MockGpuContext {
    fn max_texture_size(&self) -> u32 {
        self.state.lock().unwrap().max_texture_size
    }

    fn create_framebuffer(&self) -> FramebufferId {
        let id = FramebufferId(self.next_id());
        self.state.lock().unwrap().live_framebuffers += 1;
        self.record(format!("create_framebuffer {:?}", id));
        id
    }

    fn destroy_framebuffer(&self, fbo: FramebufferId) {
        let mut state = self.state.lock().unwrap();
        state.live_framebuffers -= 1;
        state.ops.push(format!("destroy_framebuffer {:?}", fbo));
    }

    fn bind_framebuffer(&self, fbo: FramebufferId) {
        self.record(format!("bind_framebuffer {:?}", fbo));
    }

    fn create_texture(&self) -> TextureId {
        let id = TextureId(self.next_id());
        self.state.lock().unwrap().live_textures += 1;
        self.record(format!("create_texture {:?}", id));
        id
    }

    fn delete_texture(&self, texture: TextureId) {
        let mut state = self.state.lock().unwrap();
        state.live_textures -= 1;
        state.ops.push(format!("delete_texture {:?}", texture));
    }

    fn import_image(&self, buffer: &dyn MemoryBuffer, size: Size) -> NimbusResult<ImageId> {
        if self.state.lock().unwrap().fail_import {
            return Err(NimbusError::ImportFailed("mock import failure".to_string()));
        }
        let id = ImageId(self.next_id());
        self.state.lock().unwrap().live_images += 1;
        self.record(format!(
            "import_image {:?} buffer={} {}x{}",
            id,
            buffer.handle().id,
            size.width,
            size.height
        ));
        Ok(id)
    }

    fn destroy_image(&self, image: ImageId) {
        let mut state = self.state.lock().unwrap();
        state.live_images -= 1;
        state.ops.push(format!("destroy_image {:?}", image));
    }

    fn bind_texture_image(&self, texture: TextureId, image: ImageId) {
        self.record(format!("bind_texture_image {:?} {:?}", texture, image));
    }

    fn release_texture_image(&self, texture: TextureId, image: ImageId) {
        self.record(format!("release_texture_image {:?} {:?}", texture, image));
    }

    fn set_color_space_metadata(&self, texture: TextureId, color_space: ColorSpace) {
        self.record(format!("set_color_space {:?} {:?}", texture, color_space));
    }

    fn attach_framebuffer_texture(&self, fbo: FramebufferId, texture: TextureId) {
        self.record(format!("attach_framebuffer_texture {:?} {:?}", fbo, texture));
    }

    fn flush(&self) {
        self.record("flush".to_string());
    }

    fn insert_sync_token(&self) -> SyncToken {
        let mut state = self.state.lock().unwrap();
        let token = SyncToken(state.next_token);
        state.next_token += 1;
        state.ops.push(format!("insert_sync_token {:?}", token));
        token
    }

    fn signal_sync_token(&self, token: SyncToken, callback: SyncCallback) {
        self.record(format!("signal_sync_token {:?}", token));
        // GPU work is "done" as soon as the test pumps the queue.
        self.tasks.post(callback);
    }
}

// ============================================================================
// Mock memory buffer + allocator
// ============================================================================

pub struct MockMemoryBuffer {
    handle: BufferHandle,
    size: Size,
    format: BufferFormat,
    pub color_space: Option<ColorSpace>,
}

impl MemoryBuffer for MockMemoryBuffer {
    fn handle(&self) -> BufferHandle {
        self.handle
    }

    fn set_color_space(&mut self, color_space: ColorSpace) {
        self.color_space = Some(color_space);
    }

    fn size(&self) -> Size {
        self.size
    }

    fn format(&self) -> BufferFormat {
        self.format
    }
}

struct MockAllocatorState {
    next_handle: u64,
    allocation_count: usize,
    fail_next: usize,
    null_handles: bool,
}

/// Counting allocator with failure and null-handle injection
pub struct MockBufferAllocator {
    state: Mutex<MockAllocatorState>,
}

impl MockBufferAllocator {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockAllocatorState {
                next_handle: 1,
                allocation_count: 0,
                fail_next: 0,
                null_handles: false,
            }),
        }
    }

    /// Refuse the next `n` allocation requests
    pub fn set_fail_next(&self, n: usize) {
        self.state.lock().unwrap().fail_next = n;
    }

    /// Hand out buffers whose transferable handle is the null sentinel
    pub fn set_null_handles(&self, null: bool) {
        self.state.lock().unwrap().null_handles = null;
    }

    /// Total successful allocations
    pub fn allocation_count(&self) -> usize {
        self.state.lock().unwrap().allocation_count
    }
}

impl MemoryBufferAllocator for MockBufferAllocator {
    fn allocate_buffer(
        &self,
        size: Size,
        format: BufferFormat,
        _usage: BufferUsage,
    ) -> NimbusResult<Box<dyn MemoryBuffer>> {
        let mut state = self.state.lock().unwrap();
        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(NimbusError::AllocationFailed(
                "mock allocator refused the request".to_string(),
            ));
        }
        let handle = if state.null_handles {
            BufferHandle::null()
        } else {
            let id = state.next_handle;
            state.next_handle += 1;
            BufferHandle { id }
        };
        state.allocation_count += 1;
        Ok(Box::new(MockMemoryBuffer {
            handle,
            size,
            format,
            color_space: None,
        }))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mock_gpu_tests.rs"]
mod tests;
