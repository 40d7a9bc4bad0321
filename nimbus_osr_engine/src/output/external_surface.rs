/// ExternalOutputSurface - the offscreen swap-chain controller
///
/// Orchestrates the per-frame protocol on top of the surface pool:
///
/// 1. bind: reserve a pooled surface and attach it to the shared
///    framebuffer object
/// 2. submit: flush, unbind, insert a sync token, return immediately
/// 3. sync complete (async): export the buffer handle, queue the surface
///    as in flight, notify the consumer
/// 4. acknowledgment (async): FIFO-promote the surface to displayed,
///    recycle its predecessors, synthesize swap-ack and presentation
///    feedback for the client
/// 5. reshape/teardown: atomically discard the pool and framebuffer;
///    callbacks still in flight check the generation counter and become
///    silent no-ops
///
/// All calls and callbacks run on one logical GPU-submission thread; the
/// mutex exists so the deferred continuations can reach the shared state,
/// not for parallelism. The lock is never held across a call into the
/// notifier or the client, so a consumer acknowledging synchronously
/// cannot deadlock the chain.

use std::sync::{Arc, Mutex, Weak};
use std::time::{Duration, Instant};

use crate::error::{NimbusError, NimbusResult};
use crate::gfx::{ColorSpace, Rect, Size};
use crate::gpu::{BufferHandle, GpuContext, FramebufferId, MemoryBufferAllocator};
use crate::output::flip::{FlipAckCallback, FlipNotifier};
use crate::output::output_surface::{
    LatencyInfo, OutputFrame, OutputSurface, OutputSurfaceClient, PresentationFeedback,
    ReshapeParams, SwapTimings,
};
use crate::output::surface_pool::{SurfaceKey, SurfacePool};
use crate::{osr_debug, osr_error, osr_trace};

const SOURCE: &str = "nimbus::SwapChain";

/// Nominal refresh interval reported in synthesized presentation
/// feedback; offscreen output has no real vsync to measure.
const PRESENTATION_INTERVAL: Duration = Duration::from_millis(16);

struct ChainInner {
    gpu: Arc<dyn GpuContext>,
    pool: SurfacePool,
    notifier: Arc<dyn FlipNotifier>,
    client: Option<Arc<Mutex<dyn OutputSurfaceClient>>>,
    /// Shared framebuffer object, one per chain, reused across surfaces
    fbo: Option<FramebufferId>,
    size: Size,
    color_space: ColorSpace,
    /// Bumped on every discard; async callbacks carry the generation
    /// they were issued under and bail out on mismatch
    generation: u64,
    needs_swap_size_notifications: bool,
    /// Handles already announced to the consumer this generation; a
    /// re-flipped handle is reported with `new_buffer_identity == false`
    /// so the consumer can keep its existing mapping
    announced_handles: Vec<BufferHandle>,
}

impl ChainInner {
    fn ensure_backbuffer(&mut self) -> NimbusResult<()> {
        if self.size.is_empty() {
            return Ok(());
        }
        if self.pool.rendering_key().is_some() {
            return Ok(());
        }

        let clamped = self.size.clamped_to(self.gpu.max_texture_size());
        self.pool.acquire_for_render(clamped, self.color_space)?;

        if self.fbo.is_none() {
            self.fbo = Some(self.gpu.create_framebuffer());
        }
        Ok(())
    }

    fn discard(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.pool.discard_all();

        if let Some(fbo) = self.fbo.take() {
            self.gpu.bind_framebuffer(fbo);
            self.gpu.destroy_framebuffer(fbo);
        }
        self.gpu.flush();
        // The buffers behind these handles are gone; the consumer must
        // re-import whatever the next generation announces.
        self.announced_handles.clear();
    }
}

/// Swap chain that hands composited frames to an external consumer
pub struct ExternalOutputSurface {
    inner: Arc<Mutex<ChainInner>>,
}

impl ExternalOutputSurface {
    /// Create a chain over the given GPU context, buffer allocator, and
    /// consumer notification channel
    ///
    /// The chain starts with an empty size; nothing is allocated until
    /// the first non-empty `reshape`.
    pub fn new(
        gpu: Arc<dyn GpuContext>,
        allocator: Arc<dyn MemoryBufferAllocator>,
        notifier: Arc<dyn FlipNotifier>,
    ) -> Self {
        let pool = SurfacePool::new(gpu.clone(), allocator);
        Self {
            inner: Arc::new(Mutex::new(ChainInner {
                gpu,
                pool,
                notifier,
                client: None,
                fbo: None,
                size: Size::default(),
                color_space: ColorSpace::default(),
                generation: 0,
                needs_swap_size_notifications: false,
                announced_handles: Vec::new(),
            })),
        }
    }

    /// Install the renderer-facing telemetry sink
    pub fn set_client(&mut self, client: Arc<Mutex<dyn OutputSurfaceClient>>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.client = Some(client);
        }
    }

    /// Also deliver `did_swap_with_size` with each acknowledgment
    pub fn set_needs_swap_size_notifications(&mut self, needs: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.needs_swap_size_notifications = needs;
        }
    }

    /// Current target size
    pub fn size(&self) -> Size {
        self.inner.lock().map(|inner| inner.size).unwrap_or_default()
    }

    /// Surfaces currently in existence across all states
    pub fn surface_count(&self) -> usize {
        self.inner
            .lock()
            .map(|inner| inner.pool.surface_count())
            .unwrap_or(0)
    }

    /// Frames submitted but not yet acknowledged
    pub fn in_flight_count(&self) -> usize {
        self.inner
            .lock()
            .map(|inner| inner.pool.in_flight_count())
            .unwrap_or(0)
    }

    /// Whether a surface is currently reserved for rendering
    pub fn has_backbuffer(&self) -> bool {
        self.inner
            .lock()
            .map(|inner| inner.pool.rendering_key().is_some())
            .unwrap_or(false)
    }

    // ------------------------------------------------------------------
    // Async continuations
    // ------------------------------------------------------------------

    /// Step 3: GPU work for a submitted frame finished
    fn on_sync_complete(
        weak: Weak<Mutex<ChainInner>>,
        generation: u64,
        key: SurfaceKey,
        damage: Rect,
        latency: Vec<LatencyInfo>,
    ) {
        let Some(inner_arc) = weak.upgrade() else {
            return;
        };

        // (notifier, handle, identity-changed) when the consumer must be
        // told; None to acknowledge immediately (null-handle fast path).
        let flip = {
            let Ok(mut inner) = inner_arc.lock() else {
                return;
            };
            if inner.generation != generation {
                osr_trace!(SOURCE, "ignoring sync completion from a discarded generation");
                return;
            }
            if !inner.pool.promote_to_in_flight(key) {
                return;
            }

            let handle = inner
                .pool
                .surface(key)
                .map(|surface| surface.export_handle())
                .unwrap_or_else(BufferHandle::null);
            if handle.is_null() {
                None
            } else {
                let new_identity = !inner.announced_handles.contains(&handle);
                if new_identity {
                    inner.announced_handles.push(handle);
                }
                Some((inner.notifier.clone(), handle, new_identity))
            }
        };

        match flip {
            Some((notifier, handle, new_identity)) => {
                let done: FlipAckCallback =
                    Box::new(move || Self::on_flip_ack(weak, generation, latency));
                notifier.on_after_flip(handle, damage, new_identity, done);
            }
            None => {
                // No cross-process buffer to wait on; complete the cycle
                // as if the consumer acknowledged at once.
                Self::on_flip_ack(weak, generation, latency);
            }
        }
    }

    /// Step 4: the consumer acknowledged the oldest in-flight frame
    fn on_flip_ack(weak: Weak<Mutex<ChainInner>>, generation: u64, latency: Vec<LatencyInfo>) {
        let Some(inner_arc) = weak.upgrade() else {
            return;
        };

        let delivery = {
            let Ok(mut inner) = inner_arc.lock() else {
                return;
            };
            if inner.generation != generation {
                osr_trace!(SOURCE, "ignoring stale flip acknowledgment");
                return;
            }
            let Some(key) = inner.pool.acknowledge_front() else {
                return;
            };
            osr_trace!(SOURCE, "surface {:?} acknowledged, now displayed", key);

            inner
                .client
                .clone()
                .map(|client| (client, inner.needs_swap_size_notifications, inner.size))
        };

        let Some((client, needs_size, size)) = delivery else {
            return;
        };

        // No real display timestamp exists for offscreen output; the
        // acknowledgment time is the closest approximation.
        let now = Instant::now();
        if let Ok(mut client) = client.lock() {
            client.did_receive_swap_ack(SwapTimings { swap_start: now }, latency);
            client.did_receive_presentation_feedback(PresentationFeedback {
                timestamp: now,
                interval: PRESENTATION_INTERVAL,
                flags: 0,
            });
            if needs_size {
                client.did_swap_with_size(size);
            }
        };
    }
}

impl OutputSurface for ExternalOutputSurface {
    fn ensure_backbuffer(&mut self) -> NimbusResult<()> {
        let Ok(mut inner) = self.inner.lock() else {
            return Err(NimbusError::BackendError("swap chain state poisoned".to_string()));
        };
        inner.ensure_backbuffer()
    }

    fn discard_backbuffer(&mut self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.discard();
        }
    }

    fn bind_framebuffer(&mut self) -> NimbusResult<()> {
        let Ok(mut inner) = self.inner.lock() else {
            return Err(NimbusError::BackendError("swap chain state poisoned".to_string()));
        };

        // A failed allocation degrades to "no surface this cycle"; the
        // specific failure was already logged at the allocation site.
        let _ = inner.ensure_backbuffer();

        let (Some(key), Some(fbo)) = (inner.pool.rendering_key(), inner.fbo) else {
            osr_error!(SOURCE, "no surface available to bind");
            return Err(NimbusError::NoSurfaceAvailable);
        };
        match inner.pool.surface_mut(key) {
            Some(surface) => {
                surface.bind_as_render_target(fbo);
                Ok(())
            }
            None => {
                osr_error!(SOURCE, "no surface available to bind");
                Err(NimbusError::NoSurfaceAvailable)
            }
        }
    }

    fn reshape(&mut self, params: &ReshapeParams) {
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };
        if inner.size == params.size && inner.color_space == params.color_space {
            return;
        }

        osr_debug!(
            SOURCE,
            "reshape {}x{} {:?} -> {}x{} {:?}",
            inner.size.width,
            inner.size.height,
            inner.color_space,
            params.size.width,
            params.size.height,
            params.color_space
        );
        inner.size = params.size;
        inner.color_space = params.color_space;
        inner.discard();
    }

    fn submit_frame(&mut self, frame: OutputFrame) -> NimbusResult<()> {
        let (gpu, token, generation, key) = {
            let Ok(mut inner) = self.inner.lock() else {
                return Err(NimbusError::BackendError("swap chain state poisoned".to_string()));
            };
            debug_assert_eq!(
                frame.size, inner.size,
                "submitted frame size differs from the surface size"
            );

            let Some(key) = inner.pool.rendering_key() else {
                osr_error!(SOURCE, "submit_frame without a surface being rendered");
                return Err(NimbusError::InvalidOperation(
                    "submit_frame without a bound surface".to_string(),
                ));
            };

            inner.gpu.flush();
            if let Some(surface) = inner.pool.surface_mut(key) {
                surface.release_render_target();
            }
            inner.pool.mark_submitted(key);

            let token = inner.gpu.insert_sync_token();
            (inner.gpu.clone(), token, inner.generation, key)
        };

        // Registered outside the lock: a backend is allowed to run the
        // callback synchronously and it will need the state.
        let weak = Arc::downgrade(&self.inner);
        let damage = frame.damage;
        let latency = frame.latency;
        gpu.signal_sync_token(
            token,
            Box::new(move || Self::on_sync_complete(weak, generation, key, damage, latency)),
        );
        osr_trace!(SOURCE, "frame submitted, awaiting {:?}", token);
        Ok(())
    }
}

impl Drop for ExternalOutputSurface {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.discard();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "external_surface_tests.rs"]
mod tests;
