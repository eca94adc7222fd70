//! Pointer and touch input handling for the sticker overlay.
//!
//! This module implements the gesture side of the overlay: converting raw
//! events into container space, running the move/resize/rotate sessions and
//! the new-sticker placement session, and owning the global listener pairs
//! each live session needs.
//!
//! ## Architecture
//!
//! The transform sessions form an explicit state machine (`GestureState`):
//! at most one of move, resize or rotate is live at any instant. Placement
//! of a new sticker from the picker runs alongside it because it targets no
//! existing sticker. Listener pairs are held by RAII guards, so every exit
//! path (commit, cancel, controller drop) releases them.
//!
//! ## Modules
//!
//! - `coords` - Client to container coordinate conversion and tile hit testing
//! - `event` - Pointer/touch event and modifier types
//! - `capture` - Global listener table and `CaptureGuard`
//! - `state` - Session types and their update functions
//! - `placement` - New-sticker placement session
//! - `controller` - The gesture controller tying it together

pub mod coords;
mod capture;
mod controller;
mod event;
mod placement;
mod state;

pub use capture::{CaptureGuard, InputFamily, ListenerPair, PointerCapture, SessionKind};
pub use controller::{GestureCommit, GestureController};
pub use event::{Modifiers, PointerInput};
pub use placement::PlacementSession;
pub use state::{GestureState, MoveSession, ResizeSession, RotateSession};
