//! Unit tests for the gesture controller's transform sessions.

use crate::helpers::{FakeContainer, assert_point_eq, layout, registry_with};
use stickerboard::attachment::AttachmentTracker;
use stickerboard::error::StickerError;
use stickerboard::input::{GestureController, InputFamily, PointerInput, SessionKind};
use stickerboard::types::{Corner, StickerPatch, TileId};

/// Pointer 100px from (50, 50), the centre of a 100x100 sticker at the
/// origin, at `degrees` clockwise from due right.
fn around_center(degrees: f32) -> PointerInput {
    let angle = degrees.to_radians();
    PointerInput::pointer(50.0 + 100.0 * angle.cos(), 50.0 + 100.0 * angle.sin())
}

// ============================================================================
// Move
// ============================================================================

#[test]
fn test_move_follows_pointer_delta() {
    let (mut registry, id) = registry_with(100.0, 100.0);
    let container = FakeContainer::at_origin();
    let mut gestures = GestureController::new();

    gestures
        .start_move(&registry, id, &PointerInput::pointer(120.0, 130.0), &container)
        .unwrap();
    assert!(gestures.pointer_move(&mut registry, &PointerInput::pointer(150.0, 140.0), &container));
    assert_point_eq(registry.get(id).unwrap().position(), (130.0, 110.0));

    let commit = gestures
        .pointer_up(&mut registry, &PointerInput::pointer(170.0, 100.0), &container)
        .unwrap();
    assert_eq!(commit.kind, SessionKind::Move);
    assert_point_eq(registry.get(id).unwrap().position(), (150.0, 70.0));
}

#[test]
fn test_move_accounts_for_scroll_changes_mid_gesture() {
    let (mut registry, id) = registry_with(100.0, 100.0);
    let container = FakeContainer::new((10.0, 20.0), (0.0, 0.0));
    let mut gestures = GestureController::new();

    gestures
        .start_move(&registry, id, &PointerInput::pointer(110.0, 120.0), &container)
        .unwrap();
    // The container autoscrolls while the pointer stays put
    container.scroll_to(0.0, 50.0);
    gestures.pointer_move(&mut registry, &PointerInput::pointer(110.0, 120.0), &container);

    assert_point_eq(registry.get(id).unwrap().position(), (100.0, 150.0));
}

#[test]
fn test_touch_move_uses_touch_listeners() {
    let (mut registry, id) = registry_with(0.0, 0.0);
    let container = FakeContainer::at_origin();
    let mut gestures = GestureController::new();

    gestures
        .start_move(&registry, id, &PointerInput::touch(10.0, 10.0), &container)
        .unwrap();
    assert!(gestures.capture().is_capturing(InputFamily::Touch));
    assert!(!gestures.capture().is_capturing(InputFamily::Pointer));

    gestures.pointer_up(&mut registry, &PointerInput::touch(30.0, 10.0), &container);
    assert_eq!(gestures.capture().listener_count(), 0);
    assert_point_eq(registry.get(id).unwrap().position(), (20.0, 0.0));
}

#[test]
fn test_locked_move_gesture_changes_nothing() {
    let (mut registry, id) = registry_with(100.0, 100.0);
    registry.patch(id, StickerPatch::new().locked(true)).unwrap();
    let container = FakeContainer::at_origin();
    let mut gestures = GestureController::new();

    let down = gestures.start_move(&registry, id, &PointerInput::pointer(110.0, 110.0), &container);
    assert_eq!(down, Err(StickerError::Locked(id)));
    let far = PointerInput::pointer(300.0, 300.0);
    assert!(!gestures.pointer_move(&mut registry, &far, &container));
    assert!(
        gestures
            .pointer_up(&mut registry, &PointerInput::pointer(300.0, 300.0), &container)
            .is_none()
    );

    assert_point_eq(registry.get(id).unwrap().position(), (100.0, 100.0));
    assert_eq!(gestures.capture().listener_count(), 0);
}

#[test]
fn test_move_of_attached_sticker_edits_tile_offset() {
    let (mut registry, id) = registry_with(100.0, 100.0);
    let tiles = layout(&[("t", 40.0, 40.0, 300.0, 300.0)]);
    let mut tracker = AttachmentTracker::new();
    tracker.attach(&mut registry, &tiles, id, &TileId::new("t")).unwrap();
    let container = FakeContainer::at_origin();
    let mut gestures = GestureController::new();

    gestures
        .start_move(&registry, id, &PointerInput::pointer(0.0, 0.0), &container)
        .unwrap();
    gestures.pointer_up(&mut registry, &PointerInput::pointer(25.0, -10.0), &container);

    let sticker = registry.get(id).unwrap();
    let anchor = sticker.anchor.as_ref().unwrap();
    assert!((anchor.offset_x - 85.0).abs() < 1e-4);
    assert!((anchor.offset_y - 50.0).abs() < 1e-4);
    // Stored (x, y) is the detach fallback and stays put during the move
    assert_point_eq(sticker.position(), (100.0, 100.0));
    assert_point_eq(tracker.position_of(&registry, &tiles, id).unwrap().point(), (125.0, 90.0));
}

#[test]
fn test_detach_mid_move_drops_the_commit() {
    let (mut registry, id) = registry_with(100.0, 100.0);
    let tiles = layout(&[("t", 40.0, 40.0, 300.0, 300.0)]);
    let mut tracker = AttachmentTracker::new();
    tracker.attach(&mut registry, &tiles, id, &TileId::new("t")).unwrap();
    let container = FakeContainer::at_origin();
    let mut gestures = GestureController::new();

    gestures
        .start_move(&registry, id, &PointerInput::pointer(0.0, 0.0), &container)
        .unwrap();
    assert!(gestures.pointer_move(&mut registry, &PointerInput::pointer(10.0, 10.0), &container));
    let detached_at = tracker.detach(&mut registry, &tiles, id).unwrap();
    assert_point_eq(detached_at, (110.0, 110.0));

    assert!(!gestures.pointer_move(&mut registry, &PointerInput::pointer(25.0, -10.0), &container));
    let commit = gestures
        .pointer_up(&mut registry, &PointerInput::pointer(25.0, -10.0), &container)
        .unwrap();

    assert!(!commit.applied);
    assert!(gestures.state().is_idle());
    let sticker = registry.get(id).unwrap();
    assert!(!sticker.is_attached());
    assert_point_eq(sticker.position(), (110.0, 110.0));
}

#[test]
fn test_attach_mid_move_drops_the_commit() {
    let (mut registry, id) = registry_with(100.0, 100.0);
    let tiles = layout(&[("t", 40.0, 40.0, 300.0, 300.0)]);
    let mut tracker = AttachmentTracker::new();
    let container = FakeContainer::at_origin();
    let mut gestures = GestureController::new();

    gestures
        .start_move(&registry, id, &PointerInput::pointer(0.0, 0.0), &container)
        .unwrap();
    tracker.attach(&mut registry, &tiles, id, &TileId::new("t")).unwrap();
    let commit = gestures
        .pointer_up(&mut registry, &PointerInput::pointer(50.0, 50.0), &container)
        .unwrap();

    assert!(!commit.applied);
    let sticker = registry.get(id).unwrap();
    let anchor = sticker.anchor.as_ref().unwrap();
    assert!((anchor.offset_x - 60.0).abs() < 1e-4);
    assert!((anchor.offset_y - 60.0).abs() < 1e-4);
    assert_point_eq(sticker.position(), (100.0, 100.0));
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn test_resize_right_corner_grows_outward() {
    let (mut registry, id) = registry_with(0.0, 0.0);
    let container = FakeContainer::at_origin();
    let mut gestures = GestureController::new();

    gestures
        .start_resize(
            &registry,
            id,
            Corner::BottomRight,
            &PointerInput::pointer(100.0, 100.0),
            &container,
        )
        .unwrap();
    gestures.pointer_up(&mut registry, &PointerInput::pointer(160.0, 180.0), &container);

    // |(60, 80)| = 100 -> +1.0
    assert!((registry.get(id).unwrap().scale - 2.0).abs() < 1e-4);
}

#[test]
fn test_resize_left_corner_inverts_direction() {
    let (mut registry, id) = registry_with(0.0, 0.0);
    let container = FakeContainer::at_origin();
    let mut gestures = GestureController::new();

    gestures
        .start_resize(&registry, id, Corner::TopLeft, &PointerInput::pointer(0.0, 0.0), &container)
        .unwrap();
    gestures.pointer_up(&mut registry, &PointerInput::pointer(30.0, 40.0), &container);

    // Positive delta with a left-hand corner shrinks: 1.0 - 0.5
    assert!((registry.get(id).unwrap().scale - 0.5).abs() < 1e-4);
}

#[test]
fn test_resize_clamps_at_both_ends() {
    let (mut registry, id) = registry_with(0.0, 0.0);
    let container = FakeContainer::at_origin();
    let mut gestures = GestureController::new();

    gestures
        .start_resize(&registry, id, Corner::TopRight, &PointerInput::pointer(0.0, 0.0), &container)
        .unwrap();
    gestures.pointer_move(&mut registry, &PointerInput::pointer(5000.0, 0.0), &container);
    assert_eq!(registry.get(id).unwrap().scale, 3.0);

    gestures.pointer_up(&mut registry, &PointerInput::pointer(-5000.0, 0.0), &container);
    assert_eq!(registry.get(id).unwrap().scale, 0.2);
}

// ============================================================================
// Rotate
// ============================================================================

#[test]
fn test_rotate_wraps_through_zero() {
    // 100x100 at (0, 0): centre (50, 50)
    let (mut registry, id) = registry_with(0.0, 0.0);
    registry.patch(id, StickerPatch::new().rotation(350.0)).unwrap();
    let tiles = layout(&[]);
    let container = FakeContainer::at_origin();
    let mut gestures = GestureController::new();

    // Pointer starts due right of the centre (angle 0)
    gestures
        .start_rotate(&registry, &tiles, id, &PointerInput::pointer(150.0, 50.0), &container)
        .unwrap();

    // Sweep +20 degrees in 2 degree steps
    for step in 1..=10 {
        gestures.pointer_move(&mut registry, &around_center(step as f32 * 2.0), &container);
        let rotation = registry.get(id).unwrap().rotation;
        assert!((0.0..360.0).contains(&rotation), "rotation {rotation}");
    }
    gestures.pointer_up(&mut registry, &around_center(20.0), &container);

    assert!((registry.get(id).unwrap().rotation - 10.0).abs() < 1e-2);
}

#[test]
fn test_rotate_snaps_with_shift() {
    let (mut registry, id) = registry_with(0.0, 0.0);
    let tiles = layout(&[]);
    let container = FakeContainer::at_origin();
    let mut gestures = GestureController::new();

    gestures
        .start_rotate(&registry, &tiles, id, &PointerInput::pointer(150.0, 50.0), &container)
        .unwrap();
    let pointer = around_center(37.0).with_shift();
    gestures.pointer_up(&mut registry, &pointer, &container);

    assert!((registry.get(id).unwrap().rotation - 30.0).abs() < 1e-3);
}

#[test]
fn test_rotate_without_shift_is_free() {
    let (mut registry, id) = registry_with(0.0, 0.0);
    let tiles = layout(&[]);
    let container = FakeContainer::at_origin();
    let mut gestures = GestureController::new();

    gestures
        .start_rotate(&registry, &tiles, id, &PointerInput::pointer(150.0, 50.0), &container)
        .unwrap();
    let pointer = around_center(37.0);
    assert!(!pointer.modifiers.snap());
    gestures.pointer_up(&mut registry, &pointer, &container);

    assert!((registry.get(id).unwrap().rotation - 37.0).abs() < 1e-2);
}

#[test]
fn test_rotate_center_uses_attached_position() {
    // Stored (0, 0) but anchored at tile (200, 200) + (0, 0): centre (250, 250)
    let (mut registry, id) = registry_with(0.0, 0.0);
    let tiles = layout(&[("t", 0.0, 0.0, 500.0, 500.0)]);
    let mut tracker = AttachmentTracker::new();
    tracker.attach(&mut registry, &tiles, id, &TileId::new("t")).unwrap();
    let mut tiles = tiles;
    tiles.move_tile(&TileId::new("t"), 200.0, 200.0);

    let container = FakeContainer::at_origin();
    let mut gestures = GestureController::new();
    gestures
        .start_rotate(&registry, &tiles, id, &PointerInput::pointer(350.0, 250.0), &container)
        .unwrap();
    // Quarter turn clockwise around (250, 250)
    gestures.pointer_up(&mut registry, &PointerInput::pointer(250.0, 350.0), &container);

    assert!((registry.get(id).unwrap().rotation - 90.0).abs() < 1e-3);
}

// ============================================================================
// Session exclusivity
// ============================================================================

#[test]
fn test_second_session_is_refused_while_one_is_live() {
    let (registry, id) = registry_with(0.0, 0.0);
    let container = FakeContainer::at_origin();
    let mut gestures = GestureController::new();

    gestures
        .start_move(&registry, id, &PointerInput::pointer(10.0, 10.0), &container)
        .unwrap();
    let down = PointerInput::pointer(0.0, 0.0);
    let second = gestures.start_resize(&registry, id, Corner::BottomLeft, &down, &container);

    assert_eq!(second, Err(StickerError::SessionActive));
    assert!(gestures.state().is_moving());
    assert_eq!(gestures.capture().listener_count(), 1);
}
