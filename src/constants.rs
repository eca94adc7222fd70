//! Sticker-wide constants.
//!
//! Centralizes the transform bounds and interaction tuning values so the
//! registry, the gesture sessions and the config layer agree on them.

// ============================================================================
// Transform Bounds
// ============================================================================

/// Smallest allowed sticker scale
pub const MIN_SCALE: f32 = 0.2;

/// Largest allowed sticker scale
pub const MAX_SCALE: f32 = 3.0;

/// Lowest opacity reachable through a patch
pub const MIN_OPACITY: f32 = 0.1;

/// Fully opaque
pub const MAX_OPACITY: f32 = 1.0;

/// Degrees in a full turn; stored rotation lives in `[0, FULL_TURN)`
pub const FULL_TURN: f32 = 360.0;

/// Half turn, bound for per-move rotation deltas
pub const HALF_TURN: f32 = 180.0;

// ============================================================================
// Sticker Defaults
// ============================================================================

/// Scale of a freshly placed sticker
pub const DEFAULT_SCALE: f32 = 1.0;

/// Rotation of a freshly placed sticker
pub const DEFAULT_ROTATION: f32 = 0.0;

/// Opacity of a freshly placed sticker
pub const DEFAULT_OPACITY: f32 = 1.0;

/// Offset applied on both axes when duplicating
pub const DEFAULT_DUPLICATE_OFFSET: f32 = 20.0;

// ============================================================================
// Size Presets (width in pixels, height follows the aspect ratio)
// ============================================================================

pub const SIZE_PRESET_SMALL: f32 = 96.0;
pub const SIZE_PRESET_MEDIUM: f32 = 160.0;
pub const SIZE_PRESET_LARGE: f32 = 240.0;

// ============================================================================
// Gesture Tuning
// ============================================================================

/// Rotation snap step (degrees) while the snap modifier is held
pub const DEFAULT_ROTATION_SNAP: f32 = 15.0;

/// Pointer travel (pixels) that maps to a scale change of 1.0 during resize
pub const DEFAULT_RESIZE_SENSITIVITY: f32 = 100.0;

// ============================================================================
// Config
// ============================================================================

/// Directory name under the platform config dir
pub const CONFIG_DIR_NAME: &str = "stickerboard";

/// Overlay config file name
pub const CONFIG_FILE_NAME: &str = "overlay.json";

/// Default tracing filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "stickerboard=info";
