//! Attachment Tracker - keeps anchored stickers glued to their tiles.
//!
//! An attached sticker stores only an offset from its tile's top-left; its
//! displayed position is derived from the tile's current rect every time it
//! is resolved. The tracker never polls the layout. It memoizes resolved
//! positions and recomputes them lazily, on the next render request after
//! either the layout version or the registry revision has moved.

use crate::error::{StickerError, StickerResult};
use crate::layout::TileLayout;
use crate::registry::StickerRegistry;
use crate::types::{Anchor, PlacedSticker, Point, StickerId, TileId};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Where a sticker should be drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResolvedPosition {
    /// Unattached: the stored `(x, y)`
    Free(Point),
    /// Attached and the tile exists: tile top-left + offset
    Anchored(Point),
    /// Attached but the tile is gone; draw at the last persisted `(x, y)`
    Unresolved { fallback: Point },
}

impl ResolvedPosition {
    /// Position to draw at, using the fallback when the anchor is unresolvable
    pub fn point(&self) -> Point {
        match *self {
            ResolvedPosition::Free(p) | ResolvedPosition::Anchored(p) => p,
            ResolvedPosition::Unresolved { fallback } => fallback,
        }
    }

    /// The known position, `None` if the anchor tile cannot be found
    pub fn known(&self) -> Option<Point> {
        match *self {
            ResolvedPosition::Free(p) | ResolvedPosition::Anchored(p) => Some(p),
            ResolvedPosition::Unresolved { .. } => None,
        }
    }

    pub fn is_known(&self) -> bool {
        self.known().is_some()
    }
}

/// Resolve the displayed top-left of a sticker against the current layout.
pub fn resolve_position(sticker: &PlacedSticker, layout: &impl TileLayout) -> ResolvedPosition {
    match &sticker.anchor {
        None => ResolvedPosition::Free(sticker.position()),
        Some(anchor) => match layout.tile_rect(&anchor.tile_id) {
            Some(rect) => ResolvedPosition::Anchored(rect.top_left() + anchor.offset()),
            None => ResolvedPosition::Unresolved {
                fallback: sticker.position(),
            },
        },
    }
}

/// Maintains sticker <-> tile bindings and a memoized position cache.
#[derive(Debug, Default)]
pub struct AttachmentTracker {
    cache: HashMap<StickerId, ResolvedPosition>,
    layout_version: Option<u64>,
    registry_revision: Option<u64>,
    recomputations: u64,
}

impl AttachmentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a sticker to `tile`, keeping it visually where it is now.
    pub fn attach(
        &mut self,
        registry: &mut StickerRegistry,
        layout: &impl TileLayout,
        id: StickerId,
        tile: &TileId,
    ) -> StickerResult<Anchor> {
        let sticker = registry.get(id).ok_or(StickerError::NotFound(id))?;
        let rect = layout
            .tile_rect(tile)
            .ok_or_else(|| StickerError::UnknownTile(tile.clone()))?;

        let current = resolve_position(sticker, layout).point();
        let anchor = Anchor {
            tile_id: tile.clone(),
            offset_x: current.x - rect.x,
            offset_y: current.y - rect.y,
        };

        // x/y stay as they are: they become the detach fallback
        registry.set_anchor(id, Some(anchor.clone()), None)?;
        debug!(
            %id,
            %tile,
            offset_x = anchor.offset_x,
            offset_y = anchor.offset_y,
            "attached sticker"
        );
        self.invalidate();
        Ok(anchor)
    }

    /// Attach to the first tile (enumeration order) under the sticker's centre.
    pub fn attach_to_tile_under(
        &mut self,
        registry: &mut StickerRegistry,
        layout: &impl TileLayout,
        id: StickerId,
    ) -> StickerResult<TileId> {
        let sticker = registry.get(id).ok_or(StickerError::NotFound(id))?;
        let (w, h) = sticker.scaled_size();
        let center = resolve_position(sticker, layout).point() + Point::new(w / 2.0, h / 2.0);
        let tile = layout.hit_test(center).ok_or(StickerError::NoTileUnder(id))?;
        self.attach(registry, layout, id, &tile)?;
        Ok(tile)
    }

    /// Unbind a sticker, writing its current derived position back to `x, y`
    /// so it does not jump. Returns the position written.
    pub fn detach(
        &mut self,
        registry: &mut StickerRegistry,
        layout: &impl TileLayout,
        id: StickerId,
    ) -> StickerResult<Point> {
        let sticker = registry.get(id).ok_or(StickerError::NotFound(id))?;
        if !sticker.is_attached() {
            return Err(StickerError::NotAttached(id));
        }

        let position = resolve_position(sticker, layout).point();
        registry.set_anchor(id, None, Some((position.x, position.y)))?;
        debug!(%id, x = position.x, y = position.y, "detached sticker");
        self.invalidate();
        Ok(position)
    }

    /// Drop memoized positions; the next query recomputes.
    pub fn invalidate(&mut self) {
        self.layout_version = None;
        self.registry_revision = None;
    }

    fn is_fresh(&self, registry: &StickerRegistry, layout: &impl TileLayout) -> bool {
        self.layout_version == Some(layout.version())
            && self.registry_revision == Some(registry.revision())
    }

    /// Resolved positions of every sticker, recomputed only if the layout
    /// version or registry revision moved since the last call.
    pub fn positions(
        &mut self,
        registry: &StickerRegistry,
        layout: &impl TileLayout,
    ) -> &HashMap<StickerId, ResolvedPosition> {
        if !self.is_fresh(registry, layout) {
            self.cache = registry
                .iter()
                .map(|s| (s.id, resolve_position(s, layout)))
                .collect();
            self.layout_version = Some(layout.version());
            self.registry_revision = Some(registry.revision());
            self.recomputations += 1;
            trace!(
                stickers = self.cache.len(),
                layout_version = layout.version(),
                "recomputed sticker positions"
            );
        }
        &self.cache
    }

    /// Memoized position of a single sticker
    pub fn position_of(
        &mut self,
        registry: &StickerRegistry,
        layout: &impl TileLayout,
        id: StickerId,
    ) -> Option<ResolvedPosition> {
        self.positions(registry, layout).get(&id).copied()
    }

    /// How many times the cache has been rebuilt
    pub fn recompute_count(&self) -> u64 {
        self.recomputations
    }
}
