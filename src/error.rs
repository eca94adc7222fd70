//! Error types for sticker and config operations
//!
//! Sticker mutations never panic or propagate past the overlay: every
//! rejected operation comes back as a `StickerError` so callers can log it and
//! carry on.

use crate::types::{StickerId, TileId};
use thiserror::Error;

/// Reasons a sticker operation was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StickerError {
    /// The id is not in the registry (possibly deleted mid-gesture)
    #[error("sticker {0} not found")]
    NotFound(StickerId),

    /// The sticker is locked and the mutation is not an unlock
    #[error("sticker {0} is locked")]
    Locked(StickerId),

    /// Drop coordinates were NaN or infinite
    #[error("invalid coordinates ({x}, {y})")]
    InvalidCoordinates { x: f32, y: f32 },

    /// The layout engine does not know this tile
    #[error("tile {0} not found in layout")]
    UnknownTile(TileId),

    /// No tile lies under the sticker's centre
    #[error("no tile under sticker {0}")]
    NoTileUnder(StickerId),

    /// Detach requested on a sticker with no anchor
    #[error("sticker {0} is not attached")]
    NotAttached(StickerId),

    /// A transform session is already live
    #[error("a gesture session is already active")]
    SessionActive,
}

/// Result type alias for sticker operations
pub type StickerResult<T> = Result<T, StickerError>;

/// Errors that can occur while loading, saving or watching the overlay config
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error from serde_json
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// File watcher failure
    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),

    /// The platform has no config directory
    #[error("no config directory available on this platform")]
    NoConfigDir,
}

/// Result type alias for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;
