//! Geometry and color primitives
//!
//! Small value types shared across the GPU boundary and the swap chain:
//! integer sizes and rectangles, plus the color-space tag attached to
//! surfaces. No color math happens here; `ColorSpace` exists so reshape
//! can compare it by value and so buffers can carry it as metadata.

mod color_space;
mod geometry;

pub use color_space::ColorSpace;
pub use geometry::{Rect, Size};
