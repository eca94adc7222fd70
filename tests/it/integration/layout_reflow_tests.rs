//! Layout Reflow Integration Tests
//!
//! Attached stickers must follow their tiles through layout changes without
//! any sticker mutation, and the position cache must refresh once per frame.

use crate::helpers::{FakeContainer, TestOverlayBuilder, assert_point_eq, layout};
use stickerboard::input::PointerInput;
use stickerboard::layout::TileLayout;
use stickerboard::overlay::{HitTarget, StickerHandle, StickerMenuAction};
use stickerboard::types::{Point, TileId, TileRect};

#[test]
fn test_attached_sticker_follows_tile() {
    let (mut overlay, ids) = TestOverlayBuilder::new()
        .with_sticker("pin.png", (100.0, 100.0))
        .build();
    let id = ids[0];
    let mut tiles = layout(&[("notes", 40.0, 40.0, 400.0, 300.0)]);

    overlay.open_context_menu(id, Point::ZERO);
    assert!(overlay.apply_menu_action(StickerMenuAction::AttachTo(TileId::new("notes")), &tiles));
    let anchor = overlay.registry().get(id).unwrap().anchor.clone().unwrap();
    assert!((anchor.offset_x - 60.0).abs() < 1e-4);
    assert!((anchor.offset_y - 60.0).abs() < 1e-4);

    let revision = overlay.registry().revision();
    tiles.move_tile(&TileId::new("notes"), 90.0, 40.0);
    tiles.on_animation_frame();

    assert_point_eq(overlay.render_list(&tiles)[0].position, (150.0, 100.0));
    // The sticker itself was never touched
    assert_eq!(overlay.registry().revision(), revision);
}

#[test]
fn test_many_changes_in_one_frame_recompute_once() {
    let (mut overlay, ids) = TestOverlayBuilder::new()
        .with_sticker("a.png", (10.0, 10.0))
        .with_sticker("b.png", (210.0, 10.0))
        .build();
    let mut tiles = layout(&[
        ("left", 0.0, 0.0, 200.0, 200.0),
        ("right", 200.0, 0.0, 200.0, 200.0),
    ]);
    for id in &ids {
        overlay.open_context_menu(*id, Point::ZERO);
        assert!(overlay.apply_menu_action(StickerMenuAction::AttachToTileUnder, &tiles));
    }
    overlay.render_list(&tiles);
    let count = overlay.tracker().recompute_count();
    let version = tiles.version();

    // A reflow that swaps the two tiles, reported piecemeal
    tiles.move_tile(&TileId::new("left"), 200.0, 0.0);
    tiles.move_tile(&TileId::new("right"), 0.0, 0.0);
    tiles.upsert_tile(TileId::new("right"), TileRect::new(0.0, 50.0, 200.0, 200.0));
    assert!(tiles.has_pending_changes());
    assert_eq!(tiles.version(), version);

    assert!(tiles.on_animation_frame());
    assert!(!tiles.on_animation_frame());
    assert_eq!(tiles.version(), version + 1);

    let rendered = overlay.render_list(&tiles);
    overlay.render_list(&tiles);
    assert_eq!(overlay.tracker().recompute_count(), count + 1);

    let a = rendered.iter().find(|s| s.id == ids[0]).unwrap();
    let b = rendered.iter().find(|s| s.id == ids[1]).unwrap();
    assert_point_eq(a.position, (210.0, 10.0));
    assert_point_eq(b.position, (10.0, 60.0));
}

#[test]
fn test_dragging_attached_sticker_then_tile_moves() {
    let (mut overlay, ids) = TestOverlayBuilder::new()
        .with_sticker("pin.png", (100.0, 100.0))
        .build();
    let id = ids[0];
    let container = FakeContainer::at_origin();
    let mut tiles = layout(&[("notes", 40.0, 40.0, 400.0, 300.0)]);

    overlay.open_context_menu(id, Point::ZERO);
    overlay.apply_menu_action(StickerMenuAction::AttachTo(TileId::new("notes")), &tiles);

    // Nudge the sticker inside its tile
    overlay.pointer_down(
        HitTarget::Sticker {
            id,
            handle: StickerHandle::Body,
        },
        &PointerInput::pointer(110.0, 110.0),
        &container,
        &tiles,
    );
    overlay.pointer_up(&PointerInput::pointer(130.0, 120.0), &container);
    assert_point_eq(overlay.render_list(&tiles)[0].position, (120.0, 110.0));

    // Then the tile moves; the nudge is preserved relative to it
    tiles.move_tile(&TileId::new("notes"), 0.0, 0.0);
    tiles.on_animation_frame();
    assert_point_eq(overlay.render_list(&tiles)[0].position, (80.0, 70.0));
}

#[test]
fn test_overlapping_tiles_hit_first_in_enumeration_order() {
    let tiles = layout(&[
        ("back", 0.0, 0.0, 300.0, 300.0),
        ("front", 100.0, 100.0, 100.0, 100.0),
    ]);

    assert_eq!(tiles.hit_test(Point::new(150.0, 150.0)), Some(TileId::new("back")));
    assert_eq!(tiles.hit_test(Point::new(350.0, 150.0)), None);
}

#[test]
fn test_replace_all_rebuilds_hit_testing() {
    let mut tiles = layout(&[("old", 0.0, 0.0, 100.0, 100.0)]);
    tiles.replace_all([(TileId::new("new"), TileRect::new(500.0, 500.0, 50.0, 50.0))]);
    tiles.on_animation_frame();

    assert_eq!(tiles.hit_test(Point::new(50.0, 50.0)), None);
    assert_eq!(tiles.hit_test(Point::new(525.0, 525.0)), Some(TileId::new("new")));
    assert!(tiles.tile_rect(&TileId::new("old")).is_none());
}
