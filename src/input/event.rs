//! Input event types shared by pointer and touch families.

use super::capture::InputFamily;
use crate::types::Point;

/// Keyboard modifiers held during a pointer event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
}

impl Modifiers {
    /// Rotation snaps to the configured step while shift is held
    #[inline]
    pub fn snap(&self) -> bool {
        self.shift
    }
}

/// A pointer or touch event in client coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    pub client: Point,
    pub family: InputFamily,
    pub modifiers: Modifiers,
}

impl PointerInput {
    pub fn pointer(x: f32, y: f32) -> Self {
        Self {
            client: Point::new(x, y),
            family: InputFamily::Pointer,
            modifiers: Modifiers::default(),
        }
    }

    /// First touch point of a touch event
    pub fn touch(x: f32, y: f32) -> Self {
        Self {
            client: Point::new(x, y),
            family: InputFamily::Touch,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }
}
