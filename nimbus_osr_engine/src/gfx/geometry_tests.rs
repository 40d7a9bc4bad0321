/// Tests for Size and Rect

use super::*;

// ============================================================================
// Size tests
// ============================================================================

#[test]
fn test_size_new() {
    let size = Size::new(640, 480);
    assert_eq!(size.width, 640);
    assert_eq!(size.height, 480);
}

#[test]
fn test_size_default_is_empty() {
    assert!(Size::default().is_empty());
}

#[test]
fn test_size_empty_when_either_dimension_zero() {
    assert!(Size::new(0, 480).is_empty());
    assert!(Size::new(640, 0).is_empty());
    assert!(!Size::new(1, 1).is_empty());
}

#[test]
fn test_size_clamped_to() {
    let size = Size::new(10000, 300);
    let clamped = size.clamped_to(4096);
    assert_eq!(clamped, Size::new(4096, 300));
}

#[test]
fn test_size_clamp_noop_when_within_limit() {
    let size = Size::new(640, 480);
    assert_eq!(size.clamped_to(4096), size);
}

#[test]
fn test_size_area() {
    assert_eq!(Size::new(640, 480).area(), 307_200);
    assert_eq!(Size::new(0, 480).area(), 0);
}

// ============================================================================
// Rect tests
// ============================================================================

#[test]
fn test_rect_from_size() {
    let rect = Rect::from_size(Size::new(800, 600));
    assert_eq!(rect, Rect::new(0, 0, 800, 600));
}

#[test]
fn test_rect_is_empty() {
    assert!(Rect::new(3, 4, 0, 10).is_empty());
    assert!(Rect::from_size(Size::default()).is_empty());
    assert!(!Rect::new(0, 0, 1, 1).is_empty());
}
