//! Stickerboard - decorative image stickers over a tiled dashboard.
//!
//! The crate is UI-toolkit agnostic. A host feeds it pointer/touch events,
//! the current tile layout and the container's scroll state; it keeps the
//! sticker registry, runs move/resize/rotate/placement gestures and hands
//! back a z-ordered render list.
//!
//! - [`registry`]: placed stickers, context filtering, z-order, locking
//! - [`attachment`]: sticker-to-tile anchors and the derived position cache
//! - [`layout`]: tile geometry snapshot with frame-coalesced change tracking
//! - [`input`]: coordinate conversion, gesture sessions, listener capture
//! - [`overlay`]: selection, context menu, keyboard and the render list

pub mod attachment;
pub mod config;
pub mod config_watcher;
pub mod constants;
pub mod cues;
pub mod error;
pub mod input;
pub mod layout;
pub mod logging;
pub mod overlay;
pub mod registry;
pub mod spatial_index;
pub mod types;

pub use error::{ConfigError, StickerError, StickerResult};
pub use overlay::StickerOverlay;
pub use registry::StickerRegistry;
