//! Gesture controller - runs the transform sessions and the placement session.
//!
//! ## Performance Notes
//!
//! Pointer-move fires many times per second during a gesture. Each move does
//! one coordinate conversion, one pure session update and one registry patch.
//! Non-gesture moves exit early.

use super::capture::{CaptureGuard, PointerCapture, SessionKind};
use super::coords::{ScrollContainer, to_container_space};
use super::event::PointerInput;
use super::placement::PlacementSession;
use super::state::{GestureState, MoveSession, ResizeSession, RotateSession};
use crate::attachment::resolve_position;
use crate::constants::{DEFAULT_RESIZE_SENSITIVITY, DEFAULT_ROTATION_SNAP};
use crate::cues::{CueSender, StickerCue};
use crate::error::{StickerError, StickerResult};
use crate::layout::TileLayout;
use crate::registry::StickerRegistry;
use crate::types::{
    Corner, Point, StickerAsset, StickerContext, StickerId, StickerPatch, TileRect,
};
use tracing::{debug, trace};

/// Outcome of a pointer-up that ended a transform session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureCommit {
    pub sticker_id: StickerId,
    pub kind: SessionKind,
    /// False when the sticker changed under the gesture and the final patch
    /// was dropped
    pub applied: bool,
}

/// Owns the live gesture and its global listener pairs.
pub struct GestureController {
    state: GestureState,
    /// Listener pair of the live transform session; `Some` iff not idle
    session_listeners: Option<CaptureGuard>,
    placement: Option<PlacementSession>,
    capture: PointerCapture,
    cues: CueSender,
    rotation_snap: f32,
    resize_sensitivity: f32,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureController {
    pub fn new() -> Self {
        Self {
            state: GestureState::Idle,
            session_listeners: None,
            placement: None,
            capture: PointerCapture::new(),
            cues: CueSender::default(),
            rotation_snap: DEFAULT_ROTATION_SNAP,
            resize_sensitivity: DEFAULT_RESIZE_SENSITIVITY,
        }
    }

    pub fn with_cues(mut self, cues: CueSender) -> Self {
        self.cues = cues;
        self
    }

    /// Update tuning; applies to sessions started afterwards.
    pub fn set_tuning(&mut self, rotation_snap: f32, resize_sensitivity: f32) {
        self.rotation_snap = rotation_snap;
        self.resize_sensitivity = resize_sensitivity;
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state.is_idle()
    }

    pub fn placement(&self) -> Option<&PlacementSession> {
        self.placement.as_ref()
    }

    /// Listener table the host consults to route global events
    pub fn capture(&self) -> &PointerCapture {
        &self.capture
    }

    // ========================================================================
    // Session start
    // ========================================================================

    fn ensure_idle(&self) -> StickerResult<()> {
        if self.state.is_idle() {
            Ok(())
        } else {
            debug!(
                state = ?self.state.sticker_id(),
                "session start ignored: another session is live"
            );
            Err(StickerError::SessionActive)
        }
    }

    fn begin(&mut self, state: GestureState, event: &PointerInput, kind: SessionKind) {
        self.session_listeners = Some(self.capture.acquire(event.family, kind));
        self.state = state;
    }

    /// Clear the session and release its listeners.
    fn end_session(&mut self) -> GestureState {
        self.session_listeners = None;
        self.state.take()
    }

    /// Pointer-down on a sticker body.
    pub fn start_move(
        &mut self,
        registry: &StickerRegistry,
        id: StickerId,
        event: &PointerInput,
        container: &impl ScrollContainer,
    ) -> StickerResult<()> {
        self.ensure_idle()?;
        let sticker = registry.get(id).ok_or(StickerError::NotFound(id))?;
        if sticker.locked {
            debug!(%id, "move ignored: sticker is locked");
            return Err(StickerError::Locked(id));
        }

        let pointer = to_container_space(event.client, container);
        let session = MoveSession {
            sticker_id: id,
            pointer_start: pointer,
            position_start: sticker.position(),
            is_attached: sticker.is_attached(),
            offset_start: sticker.anchor.as_ref().map_or(Point::ZERO, |a| a.offset()),
        };
        debug!(%id, attached = session.is_attached, "move session started");
        self.begin(GestureState::Moving(session), event, SessionKind::Move);
        self.cues.send(StickerCue::PickUp(id));
        Ok(())
    }

    /// Pointer-down on a resize handle.
    pub fn start_resize(
        &mut self,
        registry: &StickerRegistry,
        id: StickerId,
        corner: Corner,
        event: &PointerInput,
        container: &impl ScrollContainer,
    ) -> StickerResult<()> {
        self.ensure_idle()?;
        let sticker = registry.get(id).ok_or(StickerError::NotFound(id))?;
        if sticker.locked {
            debug!(%id, "resize ignored: sticker is locked");
            return Err(StickerError::Locked(id));
        }

        let session = ResizeSession {
            sticker_id: id,
            corner,
            pointer_start: to_container_space(event.client, container),
            scale_start: sticker.scale,
            sensitivity: self.resize_sensitivity,
        };
        debug!(%id, ?corner, "resize session started");
        self.begin(GestureState::Resizing(session), event, SessionKind::Resize);
        Ok(())
    }

    /// Pointer-down on the rotate handle. The rotation centre is the
    /// sticker's visual centre at its resolved position.
    pub fn start_rotate(
        &mut self,
        registry: &StickerRegistry,
        layout: &impl TileLayout,
        id: StickerId,
        event: &PointerInput,
        container: &impl ScrollContainer,
    ) -> StickerResult<()> {
        self.ensure_idle()?;
        let sticker = registry.get(id).ok_or(StickerError::NotFound(id))?;
        if sticker.locked {
            debug!(%id, "rotate ignored: sticker is locked");
            return Err(StickerError::Locked(id));
        }

        let (w, h) = sticker.scaled_size();
        let center = resolve_position(sticker, layout).point() + Point::new(w / 2.0, h / 2.0);
        let pointer = to_container_space(event.client, container);
        let session = RotateSession::new(id, sticker.rotation, center, pointer, self.rotation_snap);
        debug!(%id, angle_start = session.angle_start, "rotate session started");
        self.begin(GestureState::Rotating(session), event, SessionKind::Rotate);
        Ok(())
    }

    // ========================================================================
    // Session update / end
    // ========================================================================

    /// Global pointer-move. Returns true if a live session patched its sticker.
    pub fn pointer_move(
        &mut self,
        registry: &mut StickerRegistry,
        event: &PointerInput,
        container: &impl ScrollContainer,
    ) -> bool {
        if self.state.is_idle() {
            return false;
        }

        let pointer = to_container_space(event.client, container);
        let Some((id, patch)) = self.state.update(pointer, event.modifiers.snap()) else {
            return false;
        };
        trace!(%id, x = pointer.x, y = pointer.y, "gesture update");
        self.apply(registry, id, patch, "gesture update dropped")
    }

    /// Global pointer-up. Commits the final value and ends the session.
    pub fn pointer_up(
        &mut self,
        registry: &mut StickerRegistry,
        event: &PointerInput,
        container: &impl ScrollContainer,
    ) -> Option<GestureCommit> {
        if self.state.is_idle() {
            return None;
        }

        let pointer = to_container_space(event.client, container);
        let (id, patch) = self.state.update(pointer, event.modifiers.snap())?;
        let applied = self.apply(registry, id, patch, "gesture commit dropped");

        let kind = match self.end_session() {
            GestureState::Moving(_) => {
                self.cues.send(StickerCue::Drop(id));
                SessionKind::Move
            }
            GestureState::Resizing(_) => SessionKind::Resize,
            GestureState::Rotating(_) | GestureState::Idle => SessionKind::Rotate,
        };
        debug!(%id, ?kind, applied, "gesture session ended");
        Some(GestureCommit {
            sticker_id: id,
            kind,
            applied,
        })
    }

    /// Patch the session's sticker. A move session whose sticker was attached
    /// or detached after pointer-down edits the wrong field, so it applies
    /// nothing.
    fn apply(
        &self,
        registry: &mut StickerRegistry,
        id: StickerId,
        patch: StickerPatch,
        dropped: &'static str,
    ) -> bool {
        if let GestureState::Moving(session) = &self.state {
            let stale = registry
                .get(id)
                .is_some_and(|s| s.is_attached() != session.is_attached);
            if stale {
                debug!(%id, "{dropped}: attachment changed during the move");
                return false;
            }
        }
        match registry.patch(id, patch) {
            Ok(()) => true,
            Err(err) => {
                debug!(%id, %err, "{dropped}");
                false
            }
        }
    }

    // ========================================================================
    // Placement session
    // ========================================================================

    /// The picker reported "drag started with `asset`".
    pub fn begin_placement(
        &mut self,
        asset: StickerAsset,
        picker_bounds: TileRect,
    ) -> StickerResult<()> {
        if self.placement.is_some() {
            return Err(StickerError::SessionActive);
        }
        debug!(image = %asset.image_ref, "placement session started");
        self.placement = Some(PlacementSession::begin(asset, picker_bounds, &self.capture));
        Ok(())
    }

    /// Track the preview under the pointer or touch. Returns false without a placement.
    pub fn placement_move(&mut self, event: &PointerInput) -> bool {
        match self.placement.as_mut() {
            Some(placement) => {
                placement.update(event);
                true
            }
            None => false,
        }
    }

    /// Release of a placement drag. Creates a sticker at the release point
    /// when it lies outside the picker; otherwise the session just ends.
    pub fn finish_placement(
        &mut self,
        registry: &mut StickerRegistry,
        event: &PointerInput,
        container: &impl ScrollContainer,
        context: StickerContext,
    ) -> Option<StickerId> {
        let placement = self.placement.take()?;
        if !placement.is_outside_picker(event.client) {
            debug!("placement released inside picker");
            return None;
        }

        let at = to_container_space(event.client, container);
        match registry.place(placement.asset(), at.x, at.y, context) {
            Ok(id) => {
                self.cues.send(StickerCue::Drop(id));
                Some(id)
            }
            Err(err) => {
                debug!(%err, "placement dropped");
                None
            }
        }
    }

    /// Escape during a placement drag. Returns true if a placement was discarded.
    pub fn cancel_placement(&mut self) -> bool {
        let cancelled = self.placement.take().is_some();
        if cancelled {
            debug!("placement cancelled");
        }
        cancelled
    }
}
