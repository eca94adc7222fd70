//! Core types for the sticker overlay.
//!
//! This module defines the data structures shared by the registry, the
//! attachment tracker and the gesture controller: identifiers, geometry,
//! dashboard contexts and the persisted `PlacedSticker` record.

use crate::constants::{
    DEFAULT_OPACITY, DEFAULT_ROTATION, DEFAULT_SCALE, FULL_TURN, MAX_OPACITY, MAX_SCALE,
    MIN_OPACITY, MIN_SCALE, SIZE_PRESET_LARGE, SIZE_PRESET_MEDIUM, SIZE_PRESET_SMALL,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Opaque, unique sticker identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StickerId(Uuid);

impl StickerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StickerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StickerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a layout tile. Owned by the layout engine; the overlay only
/// stores it as a foreign reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(String);

impl TileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TileId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ============================================================================
// Geometry
// ============================================================================

/// A 2D point or vector in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean length when treated as a vector
    #[inline]
    pub fn length(&self) -> f32 {
        self.x.hypot(self.y)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned rectangle. Tile rects are in container-local coordinates,
/// picker bounds are in client (screen) coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TileRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl TileRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Inclusive containment test
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Resize handle position on a sticker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// +1 for the right-hand corners, -1 otherwise.
    pub fn direction(&self) -> f32 {
        match self {
            Corner::TopRight | Corner::BottomRight => 1.0,
            Corner::TopLeft | Corner::BottomLeft => -1.0,
        }
    }
}

// ============================================================================
// Dashboard Context
// ============================================================================

/// Dashboard layout mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    Bento,
    Kanban,
    List,
}

impl ViewMode {
    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Bento => "Bento",
            ViewMode::Kanban => "Kanban",
            ViewMode::List => "List",
        }
    }

    pub fn all() -> &'static [ViewMode] {
        &[ViewMode::Bento, ViewMode::Kanban, ViewMode::List]
    }
}

/// The (view mode, project) pair that scopes sticker visibility.
/// `project_id == None` is the global, project-less context.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StickerContext {
    pub view_mode: ViewMode,
    pub project_id: Option<String>,
}

impl StickerContext {
    pub fn new(view_mode: ViewMode, project_id: Option<String>) -> Self {
        Self { view_mode, project_id }
    }

    pub fn global(view_mode: ViewMode) -> Self {
        Self { view_mode, project_id: None }
    }

    pub fn project(view_mode: ViewMode, project_id: impl Into<String>) -> Self {
        Self {
            view_mode,
            project_id: Some(project_id.into()),
        }
    }
}

// ============================================================================
// Assets & Presets
// ============================================================================

/// A decorative asset offered by the sticker picker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StickerAsset {
    /// Filename or path of the image
    pub image_ref: String,
    pub width: f32,
    pub height: f32,
}

impl StickerAsset {
    pub fn new(image_ref: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            image_ref: image_ref.into(),
            width,
            height,
        }
    }
}

/// Explicit size presets; the only way to change intrinsic size after creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizePreset {
    Small,
    Medium,
    Large,
}

impl SizePreset {
    /// Target width in pixels
    pub fn width(&self) -> f32 {
        match self {
            SizePreset::Small => SIZE_PRESET_SMALL,
            SizePreset::Medium => SIZE_PRESET_MEDIUM,
            SizePreset::Large => SIZE_PRESET_LARGE,
        }
    }

    pub fn all() -> &'static [SizePreset] {
        &[SizePreset::Small, SizePreset::Medium, SizePreset::Large]
    }
}

// ============================================================================
// Placed Sticker
// ============================================================================

/// Binding of a sticker to a layout tile. While present it is the
/// authoritative source of the displayed position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub tile_id: TileId,
    /// Displayed top-left relative to the tile's current top-left
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Anchor {
    pub fn offset(&self) -> Point {
        Point::new(self.offset_x, self.offset_y)
    }
}

/// A sticker placed on the dashboard overlay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedSticker {
    pub id: StickerId,
    pub image_ref: String,
    /// Container-local position. Only a fallback snapshot while `anchor` is set.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    /// Degrees in `[0, 360)`
    pub rotation: f32,
    pub flip_x: bool,
    pub flip_y: bool,
    pub opacity: f32,
    pub z_index: i64,
    pub locked: bool,
    pub context: StickerContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Anchor>,
}

impl PlacedSticker {
    /// A new sticker with default transform at `(x, y)`.
    pub fn new(
        asset: &StickerAsset,
        x: f32,
        y: f32,
        z_index: i64,
        context: StickerContext,
    ) -> Self {
        Self {
            id: StickerId::new(),
            image_ref: asset.image_ref.clone(),
            x,
            y,
            width: asset.width,
            height: asset.height,
            scale: DEFAULT_SCALE,
            rotation: DEFAULT_ROTATION,
            flip_x: false,
            flip_y: false,
            opacity: DEFAULT_OPACITY,
            z_index,
            locked: false,
            context,
            anchor: None,
        }
    }

    /// Stored absolute position (stale while attached)
    #[inline]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.anchor.is_some()
    }

    /// Displayed size after scaling
    pub fn scaled_size(&self) -> (f32, f32) {
        (self.width * self.scale, self.height * self.scale)
    }
}

// ============================================================================
// Attribute Patch
// ============================================================================

/// Shallow partial update for a sticker. `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StickerPatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    /// Applied only while the sticker is attached
    pub tile_offset: Option<Point>,
    pub scale: Option<f32>,
    pub rotation: Option<f32>,
    pub flip_x: Option<bool>,
    pub flip_y: Option<bool>,
    pub opacity: Option<f32>,
    pub z_index: Option<i64>,
    pub locked: Option<bool>,
}

impl StickerPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(mut self, p: Point) -> Self {
        self.x = Some(p.x);
        self.y = Some(p.y);
        self
    }

    pub fn tile_offset(mut self, offset: Point) -> Self {
        self.tile_offset = Some(offset);
        self
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn rotation(mut self, rotation: f32) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn flip_x(mut self, flip: bool) -> Self {
        self.flip_x = Some(flip);
        self
    }

    pub fn flip_y(mut self, flip: bool) -> Self {
        self.flip_y = Some(flip);
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn z_index(mut self, z: i64) -> Self {
        self.z_index = Some(z);
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = Some(locked);
        self
    }

    /// True for exactly `{ locked: false }`, the one patch a locked sticker accepts.
    pub fn is_unlock_only(&self) -> bool {
        *self == StickerPatch::new().locked(false)
    }

    /// Clamp numeric fields into their invariant ranges. Non-finite values are
    /// dropped rather than stored.
    pub fn clamped(mut self) -> Self {
        self.x = self.x.filter(|v| v.is_finite());
        self.y = self.y.filter(|v| v.is_finite());
        self.tile_offset = self.tile_offset.filter(Point::is_finite);
        self.scale = self.scale.filter(|v| v.is_finite()).map(clamp_scale);
        self.rotation = self.rotation.filter(|v| v.is_finite()).map(wrap_rotation);
        self.opacity = self
            .opacity
            .filter(|v| v.is_finite())
            .map(|o| o.clamp(MIN_OPACITY, MAX_OPACITY));
        self
    }
}

/// Clamp a scale into `[MIN_SCALE, MAX_SCALE]`.
#[inline]
pub fn clamp_scale(scale: f32) -> f32 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// Wrap an angle in degrees into `[0, 360)`.
#[inline]
pub fn wrap_rotation(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(FULL_TURN);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= FULL_TURN { 0.0 } else { wrapped }
}
