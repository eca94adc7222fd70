//! Spatial Index Module
//!
//! R-tree over layout tile rectangles. Point queries narrow the candidate set
//! in O(log n); the layout snapshot then picks the winner by enumeration
//! order so results match a linear scan.

use crate::types::{Point, TileId, TileRect};
use rstar::{AABB, RTree, RTreeObject};
use std::collections::HashMap;

/// A spatial entry representing a tile's bounding box.
#[derive(Debug, Clone)]
pub struct SpatialEntry {
    pub tile_id: TileId,
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl SpatialEntry {
    pub fn new(tile_id: TileId, rect: &TileRect) -> Self {
        Self {
            tile_id,
            min_x: rect.x,
            min_y: rect.y,
            max_x: rect.right(),
            max_y: rect.bottom(),
        }
    }

    #[inline]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.min_x, self.min_y], [self.max_x, self.max_y])
    }
}

impl PartialEq for SpatialEntry {
    fn eq(&self, other: &Self) -> bool {
        self.tile_id == other.tile_id
    }
}

/// Spatial index for tiles using an R-tree.
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
    entries: HashMap<TileId, SpatialEntry>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self {
            tree: RTree::new(),
            entries: HashMap::new(),
        }
    }

    /// Build an index from `(tile, rect)` pairs.
    pub fn from_tiles<'a, I>(tiles: I) -> Self
    where
        I: IntoIterator<Item = (&'a TileId, &'a TileRect)>,
    {
        let mut index = Self::new();
        index.rebuild(tiles);
        index
    }

    /// Insert or replace the entry for a tile
    pub fn insert(&mut self, tile_id: TileId, rect: &TileRect) {
        if let Some(old_entry) = self.entries.remove(&tile_id) {
            self.tree.remove(&old_entry);
        }

        let entry = SpatialEntry::new(tile_id.clone(), rect);
        self.tree.insert(entry.clone());
        self.entries.insert(tile_id, entry);
    }

    pub fn remove(&mut self, tile_id: &TileId) -> bool {
        if let Some(entry) = self.entries.remove(tile_id) {
            self.tree.remove(&entry);
            true
        } else {
            false
        }
    }

    /// All tiles containing the point, in no particular order.
    pub fn query_point(&self, point: Point) -> Vec<TileId> {
        let point_envelope = AABB::from_point([point.x, point.y]);

        self.tree
            .locate_in_envelope_intersecting(&point_envelope)
            .filter(|entry| entry.contains_point(point.x, point.y))
            .map(|entry| entry.tile_id.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn rebuild<'a, I>(&mut self, tiles: I)
    where
        I: IntoIterator<Item = (&'a TileId, &'a TileRect)>,
    {
        let entries: Vec<SpatialEntry> = tiles
            .into_iter()
            .map(|(id, rect)| SpatialEntry::new(id.clone(), rect))
            .collect();

        self.entries = entries.iter().map(|e| (e.tile_id.clone(), e.clone())).collect();
        self.tree = RTree::bulk_load(entries);
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
