//! GPU boundary traits
//!
//! The swap chain talks to the GPU and to the cross-process buffer
//! allocator exclusively through the traits in this module. Backends
//! (a real GL/Vulkan command-buffer bridge, the demo's software context,
//! the test mocks) implement them; the swap chain itself contains no
//! platform code.

pub mod buffer;
pub mod context;

pub use buffer::*;
pub use context::*;

// Mock GPU backend for tests (no GPU required)
#[cfg(test)]
pub mod mock_gpu;
