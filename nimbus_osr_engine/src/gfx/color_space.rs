/// Color space tag for surfaces and buffers
///
/// Attached as metadata to allocated buffers and imported textures.
/// The swap chain only compares color spaces by value (a reshape with a
/// different color space discards the pool); it never converts between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpace {
    /// Standard sRGB (the default for composited browser output)
    #[default]
    Srgb,

    /// Display P3 wide gamut
    DisplayP3,

    /// Linear-gamma sRGB primaries
    LinearSrgb,
}
