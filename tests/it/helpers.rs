//! Test helpers and builders for reducing boilerplate in tests.
//!
//! This module provides:
//! - `FakeContainer` - a `ScrollContainer` with settable origin and scroll
//! - `TestOverlayBuilder` - Builder for an overlay pre-populated with stickers
//! - Small constructors for assets, contexts and tile layouts

#![allow(dead_code)]

use std::cell::Cell;
use stickerboard::config::OverlayConfig;
use stickerboard::input::coords::ScrollContainer;
use stickerboard::layout::TileLayoutSnapshot;
use stickerboard::overlay::StickerOverlay;
use stickerboard::registry::StickerRegistry;
use stickerboard::types::{
    Point, StickerAsset, StickerContext, StickerId, TileId, TileRect, ViewMode,
};

// ============================================================================
// FakeContainer - scrollable container with mutable metrics
// ============================================================================

/// Container whose bounding rect and scroll offset can change between
/// events, the way a real scrolling viewport does.
#[derive(Debug, Default)]
pub struct FakeContainer {
    origin: Cell<Point>,
    scroll: Cell<Point>,
}

impl FakeContainer {
    /// Container at the client origin, not scrolled.
    pub fn at_origin() -> Self {
        Self::default()
    }

    pub fn new(origin: (f32, f32), scroll: (f32, f32)) -> Self {
        Self {
            origin: Cell::new(Point::new(origin.0, origin.1)),
            scroll: Cell::new(Point::new(scroll.0, scroll.1)),
        }
    }

    pub fn scroll_to(&self, x: f32, y: f32) {
        self.scroll.set(Point::new(x, y));
    }

    pub fn move_to(&self, x: f32, y: f32) {
        self.origin.set(Point::new(x, y));
    }
}

impl ScrollContainer for FakeContainer {
    fn rect_origin(&self) -> Point {
        self.origin.get()
    }

    fn scroll_offset(&self) -> Point {
        self.scroll.get()
    }
}

// ============================================================================
// TestOverlayBuilder
// ============================================================================

/// Builder for creating an overlay with stickers already placed.
///
/// # Example
/// ```ignore
/// let (overlay, ids) = TestOverlayBuilder::new()
///     .with_sticker("star.png", (100.0, 100.0))
///     .with_project("alpha")
///     .build();
/// ```
pub struct TestOverlayBuilder {
    stickers: Vec<(StickerAsset, (f32, f32), StickerContext)>,
    context: StickerContext,
    config: OverlayConfig,
}

impl Default for TestOverlayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestOverlayBuilder {
    pub fn new() -> Self {
        Self {
            stickers: Vec::new(),
            context: bento(),
            config: OverlayConfig::default(),
        }
    }

    /// Set the overlay's current context; later stickers are placed in it.
    pub fn with_context(mut self, context: StickerContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_project(self, project_id: &str) -> Self {
        let view_mode = self.context.view_mode;
        self.with_context(StickerContext::project(view_mode, project_id))
    }

    pub fn with_config(mut self, config: OverlayConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a 100x100 sticker in the current context.
    pub fn with_sticker(mut self, image: &str, pos: (f32, f32)) -> Self {
        let context = self.context.clone();
        self.stickers.push((asset(image), pos, context));
        self
    }

    /// Add a sticker in an explicit context.
    pub fn with_sticker_in(
        mut self,
        image: &str,
        pos: (f32, f32),
        context: StickerContext,
    ) -> Self {
        self.stickers.push((asset(image), pos, context));
        self
    }

    /// Build the overlay; ids are returned in insertion order.
    pub fn build(self) -> (StickerOverlay, Vec<StickerId>) {
        let mut registry = StickerRegistry::new();
        let ids = self
            .stickers
            .iter()
            .map(|(asset, (x, y), context)| {
                registry
                    .place(asset, *x, *y, context.clone())
                    .expect("valid placement")
            })
            .collect();

        let mut overlay = StickerOverlay::with_registry(registry, self.config);
        overlay.set_context(self.context.view_mode, self.context.project_id.clone());
        (overlay, ids)
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// 100x100 asset
pub fn asset(image: &str) -> StickerAsset {
    StickerAsset::new(image, 100.0, 100.0)
}

pub fn bento() -> StickerContext {
    StickerContext::global(ViewMode::Bento)
}

/// Registry with a single 100x100 sticker at `(x, y)` in the global bento context.
pub fn registry_with(x: f32, y: f32) -> (StickerRegistry, StickerId) {
    let mut registry = StickerRegistry::new();
    let id = registry.place(&asset("star.png"), x, y, bento()).expect("valid placement");
    (registry, id)
}

/// Layout from `(name, x, y, w, h)` tuples, enumeration order as given.
pub fn layout(tiles: &[(&str, f32, f32, f32, f32)]) -> TileLayoutSnapshot {
    TileLayoutSnapshot::from_tiles(
        tiles
            .iter()
            .map(|&(id, x, y, w, h)| (TileId::new(id), TileRect::new(x, y, w, h))),
    )
}

/// Approximate point equality.
pub fn assert_point_eq(actual: Point, expected: (f32, f32)) {
    assert!(
        (actual.x - expected.0).abs() < 1e-3 && (actual.y - expected.1).abs() < 1e-3,
        "expected ({}, {}), got ({}, {})",
        expected.0,
        expected.1,
        actual.x,
        actual.y
    );
}
