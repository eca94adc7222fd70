//! Overlay configuration, persisted as JSON in the platform config dir.
//!
//! Missing fields fall back to defaults, so older files keep loading as new
//! options are added. Writes go through a temp file in the same directory
//! and are renamed over the target, so a crash never leaves a half-written
//! config behind.

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_DUPLICATE_OFFSET, DEFAULT_RESIZE_SENSITIVITY,
    DEFAULT_ROTATION_SNAP,
};
use crate::error::{ConfigError, ConfigResult};
use crate::registry::ContextMatchPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// How project-less stickers match project contexts
    pub context_policy: ContextMatchPolicy,
    /// Rotation snap step in degrees (snap modifier held)
    pub rotation_snap_degrees: f32,
    /// Pointer travel per 1.0 of scale during resize
    pub resize_sensitivity: f32,
    /// Offset applied to duplicates on both axes
    pub duplicate_offset: f32,
    /// One-shot entrance animation for newly visible stickers
    pub entrance_animation: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            context_policy: ContextMatchPolicy::default(),
            rotation_snap_degrees: DEFAULT_ROTATION_SNAP,
            resize_sensitivity: DEFAULT_RESIZE_SENSITIVITY,
            duplicate_offset: DEFAULT_DUPLICATE_OFFSET,
            entrance_animation: true,
        }
    }
}

impl OverlayConfig {
    /// Load and sanitize a config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        Ok(config.sanitized())
    }

    /// Load a config file, falling back to defaults if it is missing or broken.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no overlay config, using defaults");
                Self::default()
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to load overlay config, using defaults"
                );
                Self::default()
            }
        }
    }

    /// Write the config atomically, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, self)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        debug!(path = %path.display(), "saved overlay config");
        Ok(())
    }

    /// Replace values that would break the gesture math with defaults.
    pub fn sanitized(mut self) -> Self {
        if !(self.rotation_snap_degrees.is_finite() && self.rotation_snap_degrees > 0.0) {
            warn!(
                value = self.rotation_snap_degrees,
                "invalid rotation_snap_degrees, using default"
            );
            self.rotation_snap_degrees = DEFAULT_ROTATION_SNAP;
        }
        if !(self.resize_sensitivity.is_finite() && self.resize_sensitivity > 0.0) {
            warn!(value = self.resize_sensitivity, "invalid resize_sensitivity, using default");
            self.resize_sensitivity = DEFAULT_RESIZE_SENSITIVITY;
        }
        if !self.duplicate_offset.is_finite() {
            self.duplicate_offset = DEFAULT_DUPLICATE_OFFSET;
        }
        self
    }
}

/// `<config dir>/stickerboard/overlay.json`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load from the default location.
pub fn load_default() -> ConfigResult<OverlayConfig> {
    let path = default_config_path().ok_or(ConfigError::NoConfigDir)?;
    Ok(OverlayConfig::load_or_default(&path))
}
