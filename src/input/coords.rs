//! Coordinate conversion utilities for pointer interactions.
//!
//! Pointer events arrive in client (viewport) coordinates. Stickers and tiles
//! live in the coordinate space of the scrollable container that hosts them.
//! Both the container's bounding rect and its scroll offset can change
//! between two events (autoscroll, window resize), so a `CoordinateContext`
//! is built fresh for every event and never cached across frames.

use crate::types::{Point, TileId, TileRect};

/// A scrollable container hosting stickers and tiles.
pub trait ScrollContainer {
    /// Top-left of the container's bounding rect in client coordinates
    fn rect_origin(&self) -> Point;

    /// Current `(scroll_left, scroll_top)`
    fn scroll_offset(&self) -> Point;
}

/// Snapshot of the container metrics for one event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateContext {
    pub rect_origin: Point,
    pub scroll: Point,
}

impl CoordinateContext {
    /// Read the container's metrics as they are right now
    #[inline]
    pub fn capture(container: &impl ScrollContainer) -> Self {
        Self {
            rect_origin: container.rect_origin(),
            scroll: container.scroll_offset(),
        }
    }
}

pub struct CoordinateConverter;

impl CoordinateConverter {
    /// Convert a client position to container-local coordinates
    #[inline]
    pub fn client_to_container(client: Point, ctx: &CoordinateContext) -> Point {
        Point::new(
            client.x - ctx.rect_origin.x + ctx.scroll.x,
            client.y - ctx.rect_origin.y + ctx.scroll.y,
        )
    }
}

/// Resolve a client position against the container's current metrics.
#[inline]
pub fn to_container_space(client: Point, container: &impl ScrollContainer) -> Point {
    CoordinateConverter::client_to_container(client, &CoordinateContext::capture(container))
}

/// First tile, in enumeration order, whose bounds contain the point.
///
/// Overlapping tiles resolve by enumeration order, not z-order.
pub fn hit_test_tiles<'a, I>(point: Point, tiles: I) -> Option<TileId>
where
    I: IntoIterator<Item = (&'a TileId, &'a TileRect)>,
{
    tiles
        .into_iter()
        .find(|(_, rect)| rect.contains(point))
        .map(|(id, _)| id.clone())
}
