//! Layout engine interface.
//!
//! The dashboard layout engine owns the tiles. The overlay consumes two things
//! from it: a `tile_rect` lookup in container-local coordinates and a version
//! counter that advances when the layout changes. Rapid successive changes
//! inside one animation frame collapse into a single version bump.
//!
//! `TileLayoutSnapshot` is a plain in-memory implementation that hosts can
//! feed from their layout engine (and that the tests use directly).

use crate::input::coords::hit_test_tiles;
use crate::spatial_index::SpatialIndex;
use crate::types::{Point, TileId, TileRect};
use indexmap::IndexMap;
use tracing::trace;

/// Read-only view of the tile layout.
pub trait TileLayout {
    /// Current rect of a tile, `None` if it no longer exists
    fn tile_rect(&self, tile: &TileId) -> Option<TileRect>;

    /// Monotonic counter, advanced at most once per animation frame
    fn version(&self) -> u64;

    /// First tile in enumeration order containing the point
    fn hit_test(&self, point: Point) -> Option<TileId>;
}

/// Coalesces layout change notifications into one version bump per frame.
///
/// ```text
/// notify_changed() x N  ->  pending
/// on_animation_frame()  ->  version += 1, not pending
/// on_animation_frame()  ->  no-op
/// ```
#[derive(Debug, Default, Clone)]
pub struct LayoutChangeCoalescer {
    version: u64,
    pending: bool,
}

impl LayoutChangeCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a structural or attribute change. Never bumps the version directly.
    pub fn notify_changed(&mut self) {
        self.pending = true;
    }

    /// True when a change is waiting for the next frame
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Flush pending changes. Returns true if the version advanced.
    pub fn on_animation_frame(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        self.pending = false;
        self.version += 1;
        trace!(version = self.version, "layout version advanced");
        true
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

/// In-memory tile layout with an R-tree for hit testing.
#[derive(Default)]
pub struct TileLayoutSnapshot {
    tiles: IndexMap<TileId, TileRect>,
    index: SpatialIndex,
    changes: LayoutChangeCoalescer,
}

impl TileLayoutSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(tile, rect)` pairs; enumeration order is the given order.
    pub fn from_tiles<I>(tiles: I) -> Self
    where
        I: IntoIterator<Item = (TileId, TileRect)>,
    {
        let tiles: IndexMap<TileId, TileRect> = tiles.into_iter().collect();
        let index = SpatialIndex::from_tiles(tiles.iter());
        Self {
            tiles,
            index,
            changes: LayoutChangeCoalescer::new(),
        }
    }

    /// Insert a tile, or update its rect if it exists (keeps its order).
    pub fn upsert_tile(&mut self, tile: TileId, rect: TileRect) {
        self.index.insert(tile.clone(), &rect);
        self.tiles.insert(tile, rect);
        self.changes.notify_changed();
    }

    /// Move a tile's top-left to `(x, y)`. Returns false for unknown tiles.
    pub fn move_tile(&mut self, tile: &TileId, x: f32, y: f32) -> bool {
        let Some(rect) = self.tiles.get_mut(tile) else {
            return false;
        };
        rect.x = x;
        rect.y = y;
        let rect = *rect;
        self.index.insert(tile.clone(), &rect);
        self.changes.notify_changed();
        true
    }

    pub fn remove_tile(&mut self, tile: &TileId) -> Option<TileRect> {
        let removed = self.tiles.shift_remove(tile);
        if removed.is_some() {
            self.index.remove(tile);
            self.changes.notify_changed();
        }
        removed
    }

    /// Replace every tile at once (e.g. after a full relayout)
    pub fn replace_all<I>(&mut self, tiles: I)
    where
        I: IntoIterator<Item = (TileId, TileRect)>,
    {
        self.tiles = tiles.into_iter().collect();
        self.index.rebuild(self.tiles.iter());
        self.changes.notify_changed();
    }

    /// Flush changes for this frame; see `LayoutChangeCoalescer`
    pub fn on_animation_frame(&mut self) -> bool {
        self.changes.on_animation_frame()
    }

    pub fn has_pending_changes(&self) -> bool {
        self.changes.is_pending()
    }

    pub fn tiles(&self) -> impl Iterator<Item = (&TileId, &TileRect)> {
        self.tiles.iter()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl TileLayout for TileLayoutSnapshot {
    fn tile_rect(&self, tile: &TileId) -> Option<TileRect> {
        self.tiles.get(tile).copied()
    }

    fn version(&self) -> u64 {
        self.changes.version()
    }

    fn hit_test(&self, point: Point) -> Option<TileId> {
        // R-tree order is arbitrary; restore enumeration order before picking
        let mut candidates: Vec<(&TileId, &TileRect)> = self
            .index
            .query_point(point)
            .iter()
            .filter_map(|id| self.tiles.get_key_value(id))
            .collect();
        candidates.sort_by_key(|(id, _)| self.tiles.get_index_of(*id));
        hit_test_tiles(point, candidates)
    }
}
