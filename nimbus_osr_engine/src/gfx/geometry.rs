/// Integer size and rectangle types
///
/// Sizes describe surface dimensions in device pixels. An empty size
/// (either dimension zero) is the "no output yet" state: the swap chain
/// allocates nothing for it and every bind reports no surface available.

/// Size in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    /// Create a size
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// This size with both dimensions clamped to `max`
    ///
    /// Used to respect the platform maximum texture size when allocating
    /// backing surfaces.
    pub fn clamped_to(&self, max: u32) -> Size {
        Size {
            width: self.width.min(max),
            height: self.height.min(max),
        }
    }

    /// Area in pixels
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Axis-aligned rectangle in device pixels
///
/// Used for the damaged region carried with each flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a rectangle
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Whole-frame rectangle at the origin
    pub fn from_size(size: Size) -> Self {
        Self {
            x: 0,
            y: 0,
            width: size.width,
            height: size.height,
        }
    }

    /// Whether the rectangle covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
