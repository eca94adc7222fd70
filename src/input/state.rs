//! Gesture state machine - the transform sessions and their update math.
//!
//! At most one transform session is live at any instant. Each session
//! records the snapshot taken at pointer-down and exposes a total update
//! function from the current container-space pointer position to the
//! attribute values that should be written to the registry.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Moving     (pointer down on an unlocked sticker body)
//! Idle -> Resizing   (pointer down on a resize handle)
//! Idle -> Rotating   (pointer down on the rotate handle)
//!
//! Any -> Idle        (pointer up - commits the final value)
//! ```

use crate::constants::{FULL_TURN, HALF_TURN};
use crate::types::{Corner, Point, StickerId, StickerPatch, clamp_scale, wrap_rotation};

/// Live move of a sticker body.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveSession {
    pub sticker_id: StickerId,
    /// Container-space pointer position at pointer-down
    pub pointer_start: Point,
    /// Stored `(x, y)` at pointer-down
    pub position_start: Point,
    /// Attached stickers move their tile offset, not `(x, y)`
    pub is_attached: bool,
    /// Tile offset at pointer-down (zero when unattached)
    pub offset_start: Point,
}

impl MoveSession {
    /// Patch for the pointer at `pointer` (container space).
    pub fn update(&self, pointer: Point) -> StickerPatch {
        let delta = pointer - self.pointer_start;
        if self.is_attached {
            StickerPatch::new().tile_offset(self.offset_start + delta)
        } else {
            StickerPatch::new().position(self.position_start + delta)
        }
    }
}

/// Live resize from one of the four corner handles.
#[derive(Clone, Debug, PartialEq)]
pub struct ResizeSession {
    pub sticker_id: StickerId,
    pub corner: Corner,
    pub pointer_start: Point,
    pub scale_start: f32,
    /// Pointer travel that maps to a scale change of 1.0
    pub sensitivity: f32,
}

impl ResizeSession {
    /// Scale for the pointer at `pointer` (container space).
    ///
    /// Outward/inward is approximated: any positive delta component counts
    /// as "growing", and the left-hand corners invert it. This is not a
    /// projection onto the corner's diagonal and must stay that way.
    pub fn scale_for(&self, pointer: Point) -> f32 {
        let delta = pointer - self.pointer_start;
        let distance = delta.length();
        let sign = if delta.x > 0.0 || delta.y > 0.0 { 1.0 } else { -1.0 };
        let scale_delta = (distance / self.sensitivity) * self.corner.direction() * sign;
        clamp_scale(self.scale_start + scale_delta)
    }

    pub fn update(&self, pointer: Point) -> StickerPatch {
        StickerPatch::new().scale(self.scale_for(pointer))
    }
}

/// Live rotation around the sticker's visual centre.
#[derive(Clone, Debug, PartialEq)]
pub struct RotateSession {
    pub sticker_id: StickerId,
    pub rotation_start: f32,
    /// Visual centre in container space
    pub center: Point,
    /// Pointer angle (degrees) at pointer-down
    pub angle_start: f32,
    /// Snap step used while the snap modifier is held
    pub snap_step: f32,
}

impl RotateSession {
    pub fn new(
        sticker_id: StickerId,
        rotation_start: f32,
        center: Point,
        pointer: Point,
        snap_step: f32,
    ) -> Self {
        Self {
            sticker_id,
            rotation_start,
            center,
            angle_start: pointer_angle(center, pointer),
            snap_step,
        }
    }

    /// Stored rotation for the pointer at `pointer`, always in `[0, 360)`.
    pub fn rotation_for(&self, pointer: Point, snap: bool) -> f32 {
        let mut delta = pointer_angle(self.center, pointer) - self.angle_start;
        if delta > HALF_TURN {
            delta -= FULL_TURN;
        } else if delta < -HALF_TURN {
            delta += FULL_TURN;
        }

        let rotation = wrap_rotation(self.rotation_start + delta);
        if snap && self.snap_step > 0.0 {
            wrap_rotation((rotation / self.snap_step).round() * self.snap_step)
        } else {
            rotation
        }
    }

    pub fn update(&self, pointer: Point, snap: bool) -> StickerPatch {
        StickerPatch::new().rotation(self.rotation_for(pointer, snap))
    }
}

/// Angle of `pointer` around `center` in degrees, `(-180, 180]`.
#[inline]
pub fn pointer_angle(center: Point, pointer: Point) -> f32 {
    (pointer.y - center.y).atan2(pointer.x - center.x).to_degrees()
}

/// The mutually exclusive transform sessions.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum GestureState {
    /// No transform in progress
    #[default]
    Idle,
    Moving(MoveSession),
    Resizing(ResizeSession),
    Rotating(RotateSession),
}

impl GestureState {
    /// Returns true if the state is Idle
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_moving(&self) -> bool {
        matches!(self, Self::Moving(_))
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self, Self::Resizing(_))
    }

    pub fn is_rotating(&self) -> bool {
        matches!(self, Self::Rotating(_))
    }

    /// Sticker targeted by the live session, if any
    pub fn sticker_id(&self) -> Option<StickerId> {
        match self {
            Self::Idle => None,
            Self::Moving(s) => Some(s.sticker_id),
            Self::Resizing(s) => Some(s.sticker_id),
            Self::Rotating(s) => Some(s.sticker_id),
        }
    }

    /// Patch for the pointer at `pointer`; `None` when idle
    pub fn update(&self, pointer: Point, snap: bool) -> Option<(StickerId, StickerPatch)> {
        match self {
            Self::Idle => None,
            Self::Moving(s) => Some((s.sticker_id, s.update(pointer))),
            Self::Resizing(s) => Some((s.sticker_id, s.update(pointer))),
            Self::Rotating(s) => Some((s.sticker_id, s.update(pointer, snap))),
        }
    }

    /// Take the current state, leaving Idle
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}
