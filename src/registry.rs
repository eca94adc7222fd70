//! Sticker Registry - the single mutable source of truth for placed stickers.
//!
//! Every mutation clamps numeric attributes into their invariant ranges
//! before commit and is rejected (without side effects) when the target is
//! locked. Operations on unknown ids return `StickerError::NotFound` instead
//! of panicking: a sticker may be deleted by one user action while a gesture
//! on it is still in flight.

use crate::constants::DEFAULT_DUPLICATE_OFFSET;
use crate::error::{StickerError, StickerResult};
use crate::types::{
    Anchor, PlacedSticker, SizePreset, StickerAsset, StickerContext, StickerId, StickerPatch,
    ViewMode,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// How `query_by_context` treats project-less stickers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextMatchPolicy {
    /// Exact `(view_mode, project_id)` match only
    Strict,
    /// Exact match, plus stickers with no project are visible under every
    /// project of the same view mode
    #[default]
    ExactWithGlobal,
}

impl ContextMatchPolicy {
    pub fn matches(
        &self,
        sticker: &StickerContext,
        view_mode: ViewMode,
        project_id: Option<&str>,
    ) -> bool {
        if sticker.view_mode != view_mode {
            return false;
        }
        match (self, sticker.project_id.as_deref()) {
            (_, p) if p == project_id => true,
            (ContextMatchPolicy::ExactWithGlobal, None) => true,
            _ => false,
        }
    }

    /// True if some query shows stickers of both contexts together.
    ///
    /// Under `ExactWithGlobal` a project-less sticker shares a list with
    /// every sticker of its view mode, and a project sticker shares one with
    /// its own project and the project-less stickers.
    pub fn shares_visible_set(&self, a: &StickerContext, b: &StickerContext) -> bool {
        match self {
            ContextMatchPolicy::Strict => a == b,
            ContextMatchPolicy::ExactWithGlobal => {
                a.view_mode == b.view_mode
                    && (a.project_id == b.project_id
                        || a.project_id.is_none()
                        || b.project_id.is_none())
            }
        }
    }
}

/// Addressable collection of placed stickers.
pub struct StickerRegistry {
    stickers: IndexMap<StickerId, PlacedSticker>,
    policy: ContextMatchPolicy,
    duplicate_offset: f32,
    /// Bumped on every successful mutation; lets derived caches notice edits
    revision: u64,
}

impl Default for StickerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StickerRegistry {
    pub fn new() -> Self {
        Self {
            stickers: IndexMap::new(),
            policy: ContextMatchPolicy::default(),
            duplicate_offset: DEFAULT_DUPLICATE_OFFSET,
            revision: 0,
        }
    }

    pub fn with_policy(mut self, policy: ContextMatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Restore a registry from previously persisted stickers.
    pub fn from_stickers<I>(stickers: I) -> Self
    where
        I: IntoIterator<Item = PlacedSticker>,
    {
        let mut registry = Self::new();
        registry.stickers = stickers.into_iter().map(|s| (s.id, s)).collect();
        registry
    }

    pub fn policy(&self) -> ContextMatchPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: ContextMatchPolicy) {
        self.policy = policy;
        self.touch();
    }

    pub fn set_duplicate_offset(&mut self, offset: f32) {
        self.duplicate_offset = offset;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn get(&self, id: StickerId) -> Option<&PlacedSticker> {
        self.stickers.get(&id)
    }

    pub fn contains(&self, id: StickerId) -> bool {
        self.stickers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.stickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stickers.is_empty()
    }

    /// All stickers in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &PlacedSticker> {
        self.stickers.values()
    }

    /// Stickers visible in the given context, ascending by z-index.
    /// Equal z-indices keep insertion order.
    pub fn query_by_context(
        &self,
        view_mode: ViewMode,
        project_id: Option<&str>,
    ) -> Vec<&PlacedSticker> {
        let mut visible: Vec<&PlacedSticker> = self
            .stickers
            .values()
            .filter(|s| self.policy.matches(&s.context, view_mode, project_id))
            .collect();
        visible.sort_by_key(|s| s.z_index);
        visible
    }

    /// `(min, max)` z-index among stickers that can be drawn in the same
    /// list as a sticker in `context`
    fn z_extremes(&self, context: &StickerContext) -> Option<(i64, i64)> {
        self.stickers
            .values()
            .filter(|s| self.policy.shares_visible_set(context, &s.context))
            .map(|s| s.z_index)
            .fold(None, |acc, z| match acc {
                None => Some((z, z)),
                Some((lo, hi)) => Some((lo.min(z), hi.max(z))),
            })
    }

    fn next_front_z(&self, context: &StickerContext) -> i64 {
        self.z_extremes(context).map_or(1, |(_, hi)| hi + 1)
    }

    fn lookup(&self, id: StickerId) -> StickerResult<&PlacedSticker> {
        self.stickers.get(&id).ok_or(StickerError::NotFound(id))
    }

    fn lookup_unlocked(&mut self, id: StickerId) -> StickerResult<&mut PlacedSticker> {
        let sticker = self.stickers.get_mut(&id).ok_or(StickerError::NotFound(id))?;
        if sticker.locked {
            return Err(StickerError::Locked(id));
        }
        Ok(sticker)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Create a sticker at container-local `(x, y)` in `context`.
    pub fn place(
        &mut self,
        asset: &StickerAsset,
        x: f32,
        y: f32,
        context: StickerContext,
    ) -> StickerResult<StickerId> {
        if !x.is_finite() || !y.is_finite() {
            debug!(x, y, image = %asset.image_ref, "rejecting placement at invalid coordinates");
            return Err(StickerError::InvalidCoordinates { x, y });
        }

        let z_index = self.next_front_z(&context);
        let sticker = PlacedSticker::new(asset, x, y, z_index, context);
        let id = sticker.id;
        info!(%id, image = %asset.image_ref, x, y, z_index, "placed sticker");
        self.stickers.insert(id, sticker);
        self.touch();
        Ok(id)
    }

    /// Shallow-merge `patch` into the sticker after clamping.
    ///
    /// A locked sticker accepts only `{ locked: false }`. `tile_offset` is
    /// applied only while the sticker is attached.
    pub fn patch(&mut self, id: StickerId, patch: StickerPatch) -> StickerResult<()> {
        let unlock_only = patch.is_unlock_only();
        let sticker = self.stickers.get_mut(&id).ok_or(StickerError::NotFound(id))?;
        if sticker.locked && !unlock_only {
            debug!(%id, "patch rejected: sticker is locked");
            return Err(StickerError::Locked(id));
        }

        let patch = patch.clamped();
        if let Some(x) = patch.x {
            sticker.x = x;
        }
        if let Some(y) = patch.y {
            sticker.y = y;
        }
        if let (Some(offset), Some(anchor)) = (patch.tile_offset, sticker.anchor.as_mut()) {
            anchor.offset_x = offset.x;
            anchor.offset_y = offset.y;
        }
        if let Some(scale) = patch.scale {
            sticker.scale = scale;
        }
        if let Some(rotation) = patch.rotation {
            sticker.rotation = rotation;
        }
        if let Some(flip_x) = patch.flip_x {
            sticker.flip_x = flip_x;
        }
        if let Some(flip_y) = patch.flip_y {
            sticker.flip_y = flip_y;
        }
        if let Some(opacity) = patch.opacity {
            sticker.opacity = opacity;
        }
        if let Some(z) = patch.z_index {
            sticker.z_index = z;
        }
        if let Some(locked) = patch.locked {
            sticker.locked = locked;
        }
        self.touch();
        Ok(())
    }

    /// Replace the anchor. Used by the attachment tracker; respects the lock.
    pub(crate) fn set_anchor(
        &mut self,
        id: StickerId,
        anchor: Option<Anchor>,
        fallback: Option<(f32, f32)>,
    ) -> StickerResult<()> {
        let sticker = self.lookup_unlocked(id)?;
        if let Some((x, y)) = fallback {
            sticker.x = x;
            sticker.y = y;
        }
        sticker.anchor = anchor;
        self.touch();
        Ok(())
    }

    /// Change intrinsic size to a preset width, keeping the aspect ratio.
    pub fn set_size_preset(&mut self, id: StickerId, preset: SizePreset) -> StickerResult<()> {
        let sticker = self.lookup_unlocked(id)?;
        let width = preset.width();
        let aspect = if sticker.width > 0.0 {
            sticker.height / sticker.width
        } else {
            1.0
        };
        sticker.width = width;
        sticker.height = width * aspect;
        debug!(%id, ?preset, "size preset applied");
        self.touch();
        Ok(())
    }

    pub fn remove(&mut self, id: StickerId) -> StickerResult<PlacedSticker> {
        let removed = self.stickers.shift_remove(&id).ok_or(StickerError::NotFound(id))?;
        info!(%id, "removed sticker");
        self.touch();
        Ok(removed)
    }

    /// Copy a sticker under a new id, offset and raised to the front.
    /// The copy always starts unlocked.
    pub fn duplicate(&mut self, id: StickerId) -> StickerResult<StickerId> {
        let source = self.lookup(id)?;
        let offset = self.duplicate_offset;

        let mut copy = source.clone();
        copy.id = StickerId::new();
        copy.x += offset;
        copy.y += offset;
        if let Some(anchor) = copy.anchor.as_mut() {
            anchor.offset_x += offset;
            anchor.offset_y += offset;
        }
        copy.locked = false;
        copy.z_index = self.next_front_z(&copy.context);

        let new_id = copy.id;
        info!(source = %id, %new_id, "duplicated sticker");
        self.stickers.insert(new_id, copy);
        self.touch();
        Ok(new_id)
    }

    /// Raise above every sticker it can be drawn with. Returns the new z-index.
    pub fn bring_to_front(&mut self, id: StickerId) -> StickerResult<i64> {
        let context = self.lookup(id)?.context.clone();
        let z = self.next_front_z(&context);
        self.lookup_unlocked(id)?.z_index = z;
        self.touch();
        Ok(z)
    }

    /// Lower below every sticker it can be drawn with. Returns the new z-index.
    pub fn send_to_back(&mut self, id: StickerId) -> StickerResult<i64> {
        let context = self.lookup(id)?.context.clone();
        let z = self.z_extremes(&context).map_or(0, |(lo, _)| lo - 1);
        self.lookup_unlocked(id)?.z_index = z;
        self.touch();
        Ok(z)
    }
}
