/// SurfacePool - bounded surface arena with the occupancy lifecycle
///
/// Owns every BackingSurface in a slotmap arena and tracks which named
/// slot or queue currently holds each key. Ownership is exclusive and
/// moves between slots, never aliases:
///
/// ```text
///   free -> rendering -> awaiting sync -> in flight -> displayed
///     ^                                                    |
///     +----------------- retired <------------------------+
/// ```
///
/// `retired` keeps the previously displayed buffer alive one extra
/// acknowledgment cycle, so a consumer that still scans out the old
/// buffer while importing the new one never reads recycled memory.
///
/// Sizing is unbounded-but-pooled: a new surface is allocated only when
/// no matching free surface exists. With one frame rendered, one in
/// flight, and one displayed, the pool settles at three surfaces.

use std::collections::VecDeque;
use std::sync::Arc;

use slotmap::{new_key_type, SlotMap};

use crate::error::NimbusResult;
use crate::gfx::{ColorSpace, Size};
use crate::gpu::{GpuContext, MemoryBufferAllocator};
use crate::osr_trace;
use crate::output::backing_surface::BackingSurface;

const SOURCE: &str = "nimbus::SurfacePool";

new_key_type! {
    /// Stable key for a BackingSurface within the pool arena.
    ///
    /// Keys are invalidated when the pool is discarded; lookups with a
    /// stale key simply return `None`.
    pub struct SurfaceKey;
}

/// Which slot or queue currently holds a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    /// Available for reuse
    Free,
    /// Reserved as (or bound as) the current render target
    Rendering,
    /// Submitted; awaiting GPU sync or consumer acknowledgment
    InFlight,
    /// Last acknowledged frame, presumed on screen
    Displayed,
    /// Previously displayed, retained one extra acknowledgment cycle
    Retired,
}

/// Arena of backing surfaces plus their occupancy bookkeeping
pub struct SurfacePool {
    gpu: Arc<dyn GpuContext>,
    allocator: Arc<dyn MemoryBufferAllocator>,
    surfaces: SlotMap<SurfaceKey, BackingSurface>,
    free: Vec<SurfaceKey>,
    rendering: Option<SurfaceKey>,
    awaiting_sync: VecDeque<SurfaceKey>,
    in_flight: VecDeque<SurfaceKey>,
    displayed: Option<SurfaceKey>,
    retired: Option<SurfaceKey>,
}

impl SurfacePool {
    /// Create an empty pool using the given GPU context and allocator
    pub fn new(gpu: Arc<dyn GpuContext>, allocator: Arc<dyn MemoryBufferAllocator>) -> Self {
        Self {
            gpu,
            allocator,
            surfaces: SlotMap::with_key(),
            free: Vec::new(),
            rendering: None,
            awaiting_sync: VecDeque::new(),
            in_flight: VecDeque::new(),
            displayed: None,
            retired: None,
        }
    }

    /// Reserve a surface for rendering
    ///
    /// Returns `Ok(None)` for an empty size (nothing to do; the caller
    /// re-requests later). Reuses a matching free surface when one
    /// exists; otherwise allocates a new one.
    ///
    /// At most one surface can be reserved at a time; callers must
    /// submit or discard before acquiring again.
    ///
    /// # Errors
    ///
    /// Propagates allocation/import failures from `BackingSurface`.
    /// The pool is unchanged on error.
    pub fn acquire_for_render(
        &mut self,
        size: Size,
        color_space: ColorSpace,
    ) -> NimbusResult<Option<SurfaceKey>> {
        if size.is_empty() {
            return Ok(None);
        }
        assert!(
            self.rendering.is_none(),
            "a surface is already reserved for rendering"
        );

        if let Some(pos) = self.free.iter().position(|&key| {
            self.surfaces
                .get(key)
                .is_some_and(|s| s.size() == size && s.color_space() == color_space)
        }) {
            let key = self.free.swap_remove(pos);
            osr_trace!(SOURCE, "reusing free surface {:?}", key);
            self.rendering = Some(key);
            return Ok(Some(key));
        }

        let surface =
            BackingSurface::allocate(self.gpu.clone(), self.allocator.as_ref(), size, color_space)?;
        let key = self.surfaces.insert(surface);
        osr_trace!(SOURCE, "allocated surface {:?} ({}x{})", key, size.width, size.height);
        self.rendering = Some(key);
        Ok(Some(key))
    }

    /// Key of the surface currently reserved for rendering
    pub fn rendering_key(&self) -> Option<SurfaceKey> {
        self.rendering
    }

    /// Borrow a surface by key
    pub fn surface(&self, key: SurfaceKey) -> Option<&BackingSurface> {
        self.surfaces.get(key)
    }

    /// Mutably borrow a surface by key
    pub fn surface_mut(&mut self, key: SurfaceKey) -> Option<&mut BackingSurface> {
        self.surfaces.get_mut(key)
    }

    /// Move the rendering surface to the awaiting-GPU-sync queue
    pub fn mark_submitted(&mut self, key: SurfaceKey) {
        debug_assert_eq!(self.rendering, Some(key), "submitting a surface that is not rendering");
        self.rendering = None;
        self.awaiting_sync.push_back(key);
    }

    /// Move a sync-completed surface to the in-flight queue
    ///
    /// Returns false (and does nothing) if `key` is not the frontmost
    /// surface awaiting sync, which only happens when the pool was
    /// discarded since the surface was submitted.
    pub fn promote_to_in_flight(&mut self, key: SurfaceKey) -> bool {
        if self.awaiting_sync.front() != Some(&key) {
            return false;
        }
        self.awaiting_sync.pop_front();
        self.in_flight.push_back(key);
        true
    }

    /// Resolve the oldest in-flight surface as acknowledged
    ///
    /// Acknowledgments are strictly FIFO: the front surface becomes
    /// displayed, the previously displayed one is retired, and the
    /// previously retired one returns to the free list. Returns the key
    /// of the newly displayed surface, or `None` when nothing is in
    /// flight (stale acknowledgment after a discard).
    pub fn acknowledge_front(&mut self) -> Option<SurfaceKey> {
        let key = self.in_flight.pop_front()?;

        if let Some(recycled) = self.retired.take() {
            osr_trace!(SOURCE, "recycling surface {:?}", recycled);
            self.free.push(recycled);
        }
        self.retired = self.displayed.take();
        self.displayed = Some(key);
        Some(key)
    }

    /// Unbind and destroy every surface and clear all occupancy queues
    ///
    /// Used on reshape and teardown; safe to call on an empty pool.
    pub fn discard_all(&mut self) {
        self.free.clear();
        self.rendering = None;
        self.awaiting_sync.clear();
        self.in_flight.clear();
        self.displayed = None;
        self.retired = None;
        // Dropping each surface releases its binding, texture, image,
        // and buffer in order.
        self.surfaces.clear();
    }

    /// Occupancy state of a surface, if it still exists
    pub fn state_of(&self, key: SurfaceKey) -> Option<SurfaceState> {
        if !self.surfaces.contains_key(key) {
            return None;
        }
        if self.rendering == Some(key) {
            Some(SurfaceState::Rendering)
        } else if self.awaiting_sync.contains(&key) || self.in_flight.contains(&key) {
            Some(SurfaceState::InFlight)
        } else if self.displayed == Some(key) {
            Some(SurfaceState::Displayed)
        } else if self.retired == Some(key) {
            Some(SurfaceState::Retired)
        } else {
            Some(SurfaceState::Free)
        }
    }

    /// Total surfaces currently in existence
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Surfaces available for immediate reuse
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Surfaces submitted but not yet acknowledged
    pub fn in_flight_count(&self) -> usize {
        self.awaiting_sync.len() + self.in_flight.len()
    }

    /// Whether the pool holds no surfaces at all
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "surface_pool_tests.rs"]
mod tests;
