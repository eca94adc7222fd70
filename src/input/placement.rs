//! New-sticker placement session.
//!
//! Started when the user begins dragging an asset out of the sticker picker.
//! Pointer and touch input are handled identically: the session installs
//! one listener pair per family up front, tracks a preview position under
//! whichever family is driving it, and on release decides whether the drop
//! landed outside the picker.

use super::capture::{CaptureGuard, InputFamily, PointerCapture, SessionKind};
use super::event::PointerInput;
use crate::types::{Point, StickerAsset, TileRect};

/// A pending drag of a new sticker from the picker.
#[derive(Debug)]
pub struct PlacementSession {
    asset: StickerAsset,
    /// Picker bounds in client coordinates
    picker_bounds: TileRect,
    /// Last client position seen, for the drag preview
    preview: Option<Point>,
    _listeners: [CaptureGuard; 2],
}

impl PlacementSession {
    pub fn begin(asset: StickerAsset, picker_bounds: TileRect, capture: &PointerCapture) -> Self {
        let listeners = [
            capture.acquire(InputFamily::Pointer, SessionKind::Placement),
            capture.acquire(InputFamily::Touch, SessionKind::Placement),
        ];
        Self {
            asset,
            picker_bounds,
            preview: None,
            _listeners: listeners,
        }
    }

    pub fn asset(&self) -> &StickerAsset {
        &self.asset
    }

    pub fn picker_bounds(&self) -> TileRect {
        self.picker_bounds
    }

    /// Client position of the drag preview, once the pointer has moved
    pub fn preview(&self) -> Option<Point> {
        self.preview
    }

    /// Track the preview under the pointer or first touch
    pub fn update(&mut self, event: &PointerInput) {
        self.preview = Some(event.client);
    }

    /// True if releasing at `client` should create a sticker
    pub fn is_outside_picker(&self, client: Point) -> bool {
        !self.picker_bounds.contains(client)
    }
}
