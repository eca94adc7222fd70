//! Sticker overlay - selection, context menu and the render list.
//!
//! `StickerOverlay` is the thin presentation layer the host talks to. It owns
//! the registry, the attachment tracker and the gesture controller, keeps
//! the single selection and the context-menu target, and produces the
//! z-ordered list of stickers to draw for the current dashboard context.

use crate::attachment::AttachmentTracker;
use crate::config::OverlayConfig;
use crate::cues::CueSender;
use crate::input::coords::ScrollContainer;
use crate::input::{GestureCommit, GestureController, PointerInput};
use crate::layout::TileLayout;
use crate::registry::StickerRegistry;
use crate::types::{
    Corner, Point, SizePreset, StickerAsset, StickerContext, StickerId, StickerPatch, TileId,
    TileRect, ViewMode,
};
use std::collections::HashSet;
use tracing::debug;

/// Part of a sticker under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StickerHandle {
    Body,
    Resize(Corner),
    Rotate,
}

/// What a pointer-down landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
    Sticker { id: StickerId, handle: StickerHandle },
    ContextMenu,
    Picker,
    /// Anything else: tiles, empty dashboard
    Background,
}

/// Context-menu entries.
#[derive(Clone, Debug, PartialEq)]
pub enum StickerMenuAction {
    BringToFront,
    SendToBack,
    Duplicate,
    Delete,
    ToggleLock,
    FlipX,
    FlipY,
    SetOpacity(f32),
    SetSizePreset(SizePreset),
    AttachToTileUnder,
    AttachTo(TileId),
    Detach,
}

/// Keys the overlay reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayKey {
    Escape,
    Delete,
    Backspace,
}

/// Open context menu.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContextMenu {
    pub sticker_id: StickerId,
    /// Client position the menu was opened at
    pub at: Point,
}

/// What a pointer-up finished.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerUpOutcome {
    pub commit: Option<GestureCommit>,
    pub placed: Option<StickerId>,
}

/// Everything the host needs to draw one sticker.
///
/// Transforms apply in this order: scale from the top-left corner, so the
/// drawn box spans `position` to `position + (width, height) * scale`; then
/// flip and rotate around that box's centre,
/// `position + (width * scale / 2, height * scale / 2)`. The rotate gesture
/// uses the same centre.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedSticker {
    pub id: StickerId,
    pub image_ref: String,
    /// Container-local top-left of the unrotated, scaled box. Scaling is
    /// anchored here.
    pub position: Point,
    /// False when the anchor tile is gone and `position` is the last known one
    pub position_known: bool,
    /// Unscaled size
    pub width: f32,
    pub height: f32,
    /// Multiplier on `width` and `height`, with the top-left held fixed
    pub scale: f32,
    /// Clockwise degrees around the centre of the scaled box
    pub rotation: f32,
    pub flip_x: bool,
    pub flip_y: bool,
    pub opacity: f32,
    pub z_index: i64,
    pub locked: bool,
    pub attached: bool,
    pub selected: bool,
    /// True exactly once per sticker: the first time it is rendered
    pub animate_entrance: bool,
}

pub struct StickerOverlay {
    registry: StickerRegistry,
    tracker: AttachmentTracker,
    gestures: GestureController,
    context: StickerContext,
    selected: Option<StickerId>,
    context_menu: Option<ContextMenu>,
    /// Stickers that already played their entrance animation
    entered: HashSet<StickerId>,
    config: OverlayConfig,
}

impl Default for StickerOverlay {
    fn default() -> Self {
        Self::new(OverlayConfig::default())
    }
}

impl StickerOverlay {
    pub fn new(config: OverlayConfig) -> Self {
        Self::with_registry(StickerRegistry::new(), config)
    }

    /// Wrap stickers loaded from the external store.
    pub fn with_registry(registry: StickerRegistry, config: OverlayConfig) -> Self {
        let mut overlay = Self {
            registry,
            tracker: AttachmentTracker::new(),
            gestures: GestureController::new(),
            context: StickerContext::default(),
            selected: None,
            context_menu: None,
            entered: HashSet::new(),
            config: OverlayConfig::default(),
        };
        overlay.apply_config(config);
        overlay
    }

    pub fn with_cues(mut self, cues: CueSender) -> Self {
        self.gestures = self.gestures.with_cues(cues);
        self
    }

    /// Apply a (re)loaded config. Live sessions keep their original tuning.
    pub fn apply_config(&mut self, config: OverlayConfig) {
        let config = config.sanitized();
        self.registry.set_policy(config.context_policy);
        self.registry.set_duplicate_offset(config.duplicate_offset);
        self.gestures
            .set_tuning(config.rotation_snap_degrees, config.resize_sensitivity);
        self.config = config;
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn registry(&self) -> &StickerRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut StickerRegistry {
        &mut self.registry
    }

    pub fn tracker(&self) -> &AttachmentTracker {
        &self.tracker
    }

    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    // ========================================================================
    // Context & selection
    // ========================================================================

    pub fn context(&self) -> &StickerContext {
        &self.context
    }

    /// Switch dashboard context. Selection and the menu do not carry over.
    pub fn set_context(&mut self, view_mode: ViewMode, project_id: Option<String>) {
        let context = StickerContext::new(view_mode, project_id);
        if context != self.context {
            debug!(view_mode = view_mode.label(), project = ?context.project_id, "context changed");
            self.context = context;
            self.selected = None;
            self.context_menu = None;
        }
    }

    pub fn selected(&self) -> Option<StickerId> {
        self.selected
    }

    /// Select a sticker (or clear with `None`). Unknown ids clear the selection.
    pub fn set_selected(&mut self, id: Option<StickerId>) {
        self.selected = id.filter(|id| self.registry.contains(*id));
    }

    pub fn context_menu(&self) -> Option<ContextMenu> {
        self.context_menu
    }

    // ========================================================================
    // Pointer routing
    // ========================================================================

    /// Pointer-down. Selects and starts a session on sticker hits; clears the
    /// selection for anything outside stickers, the menu and the picker.
    pub fn pointer_down(
        &mut self,
        target: HitTarget,
        event: &PointerInput,
        container: &impl ScrollContainer,
        layout: &impl TileLayout,
    ) -> bool {
        match target {
            HitTarget::ContextMenu | HitTarget::Picker => false,
            HitTarget::Background => {
                self.selected = None;
                self.context_menu = None;
                false
            }
            HitTarget::Sticker { id, handle } => {
                if !self.registry.contains(id) {
                    return false;
                }
                self.selected = Some(id);
                self.context_menu = None;

                let started = match handle {
                    StickerHandle::Body => {
                        self.gestures.start_move(&self.registry, id, event, container)
                    }
                    StickerHandle::Resize(corner) => {
                        self.gestures
                            .start_resize(&self.registry, id, corner, event, container)
                    }
                    StickerHandle::Rotate => {
                        self.gestures
                            .start_rotate(&self.registry, layout, id, event, container)
                    }
                };
                match started {
                    Ok(()) => true,
                    Err(err) => {
                        debug!(%id, %err, "gesture not started");
                        false
                    }
                }
            }
        }
    }

    /// Global pointer/touch move.
    pub fn pointer_move(&mut self, event: &PointerInput, container: &impl ScrollContainer) -> bool {
        let placing = self.gestures.placement_move(event);
        let moved = self.gestures.pointer_move(&mut self.registry, event, container);
        placing || moved
    }

    /// Global pointer/touch up.
    pub fn pointer_up(
        &mut self,
        event: &PointerInput,
        container: &impl ScrollContainer,
    ) -> PointerUpOutcome {
        let commit = self.gestures.pointer_up(&mut self.registry, event, container);
        let placed = if self.gestures.placement().is_some() {
            let context = self.context.clone();
            self.gestures
                .finish_placement(&mut self.registry, event, container, context)
        } else {
            None
        };
        if let Some(id) = placed {
            self.selected = Some(id);
        }
        PointerUpOutcome { commit, placed }
    }

    /// The picker started dragging `asset`.
    pub fn begin_placement(&mut self, asset: StickerAsset, picker_bounds: TileRect) -> bool {
        match self.gestures.begin_placement(asset, picker_bounds) {
            Ok(()) => true,
            Err(err) => {
                debug!(%err, "placement not started");
                false
            }
        }
    }

    // ========================================================================
    // Keyboard
    // ========================================================================

    pub fn key(&mut self, key: OverlayKey) -> bool {
        match key {
            OverlayKey::Escape => {
                if self.gestures.cancel_placement() {
                    true
                } else if self.context_menu.take().is_some() {
                    true
                } else {
                    self.selected.take().is_some()
                }
            }
            OverlayKey::Delete | OverlayKey::Backspace => {
                let Some(id) = self.selected else {
                    return false;
                };
                if self.registry.get(id).is_some_and(|s| s.locked) {
                    debug!(%id, "delete ignored: sticker is locked");
                    return false;
                }
                self.delete(id)
            }
        }
    }

    // ========================================================================
    // Context menu
    // ========================================================================

    pub fn open_context_menu(&mut self, id: StickerId, at: Point) -> bool {
        if !self.registry.contains(id) {
            return false;
        }
        self.selected = Some(id);
        self.context_menu = Some(ContextMenu { sticker_id: id, at });
        true
    }

    pub fn close_context_menu(&mut self) {
        self.context_menu = None;
    }

    /// Run a menu action on the menu's sticker and close the menu.
    pub fn apply_menu_action(
        &mut self,
        action: StickerMenuAction,
        layout: &impl TileLayout,
    ) -> bool {
        let Some(menu) = self.context_menu.take() else {
            return false;
        };
        let id = menu.sticker_id;
        let Some(sticker) = self.registry.get(id) else {
            return false;
        };
        let (locked, flip_x, flip_y) = (sticker.locked, sticker.flip_x, sticker.flip_y);

        let result = match action {
            StickerMenuAction::BringToFront => self.registry.bring_to_front(id).map(|_| ()),
            StickerMenuAction::SendToBack => self.registry.send_to_back(id).map(|_| ()),
            StickerMenuAction::Duplicate => self.registry.duplicate(id).map(|copy| {
                self.selected = Some(copy);
            }),
            StickerMenuAction::Delete => return self.delete(id),
            StickerMenuAction::ToggleLock => {
                self.registry.patch(id, StickerPatch::new().locked(!locked))
            }
            StickerMenuAction::FlipX => {
                self.registry.patch(id, StickerPatch::new().flip_x(!flip_x))
            }
            StickerMenuAction::FlipY => {
                self.registry.patch(id, StickerPatch::new().flip_y(!flip_y))
            }
            StickerMenuAction::SetOpacity(opacity) => {
                self.registry.patch(id, StickerPatch::new().opacity(opacity))
            }
            StickerMenuAction::SetSizePreset(preset) => self.registry.set_size_preset(id, preset),
            StickerMenuAction::AttachToTileUnder => self
                .tracker
                .attach_to_tile_under(&mut self.registry, layout, id)
                .map(|_| ()),
            StickerMenuAction::AttachTo(tile) => self
                .tracker
                .attach(&mut self.registry, layout, id, &tile)
                .map(|_| ()),
            StickerMenuAction::Detach => {
                self.tracker.detach(&mut self.registry, layout, id).map(|_| ())
            }
        };

        match result {
            Ok(()) => true,
            Err(err) => {
                debug!(%id, %err, "menu action rejected");
                false
            }
        }
    }

    fn delete(&mut self, id: StickerId) -> bool {
        match self.registry.remove(id) {
            Ok(_) => {
                if self.selected == Some(id) {
                    self.selected = None;
                }
                self.entered.remove(&id);
                true
            }
            Err(err) => {
                debug!(%id, %err, "delete rejected");
                false
            }
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Stickers of the current context in paint order (ascending z-index).
    pub fn render_list(&mut self, layout: &impl TileLayout) -> Vec<RenderedSticker> {
        let positions = self.tracker.positions(&self.registry, layout);
        let view_mode = self.context.view_mode;
        let project_id = self.context.project_id.as_deref();
        let animate = self.config.entrance_animation;

        self.registry
            .query_by_context(view_mode, project_id)
            .into_iter()
            .map(|sticker| {
                let resolved = positions.get(&sticker.id).copied();
                let first_render = self.entered.insert(sticker.id);
                RenderedSticker {
                    id: sticker.id,
                    image_ref: sticker.image_ref.clone(),
                    position: resolved.map_or(sticker.position(), |r| r.point()),
                    position_known: resolved.is_none_or(|r| r.is_known()),
                    width: sticker.width,
                    height: sticker.height,
                    scale: sticker.scale,
                    rotation: sticker.rotation,
                    flip_x: sticker.flip_x,
                    flip_y: sticker.flip_y,
                    opacity: sticker.opacity,
                    z_index: sticker.z_index,
                    locked: sticker.locked,
                    attached: sticker.is_attached(),
                    selected: self.selected == Some(sticker.id),
                    animate_entrance: animate && first_render,
                }
            })
            .collect()
    }
}
