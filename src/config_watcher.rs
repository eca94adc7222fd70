//! Config hot-reload.
//!
//! Watches the directory containing the overlay config (editors often
//! replace files rather than writing in place) and reloads when an event
//! touches the config file. Polling is non-blocking so the host can call it
//! once per frame.

use crate::config::OverlayConfig;
use crate::error::ConfigResult;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use tracing::{debug, warn};

/// Result of a config change on disk.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigEvent {
    Reloaded(OverlayConfig),
    Error(String),
}

pub struct ConfigWatcher {
    path: PathBuf,
    rx: Receiver<notify::Result<Event>>,
    _watcher: RecommendedWatcher,
}

impl ConfigWatcher {
    pub fn new(path: PathBuf) -> ConfigResult<Self> {
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(tx)?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        debug!(path = %path.display(), "watching overlay config");

        Ok(Self {
            path,
            rx,
            _watcher: watcher,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn concerns_config(&self, event: &Event) -> bool {
        matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
            && event
                .paths
                .iter()
                .any(|p| p.file_name() == self.path.file_name())
    }

    /// Drain pending watcher events; reload at most once per call.
    pub fn poll(&mut self) -> Option<ConfigEvent> {
        let mut changed = false;
        loop {
            match self.rx.try_recv() {
                Ok(Ok(event)) => changed |= self.concerns_config(&event),
                Ok(Err(e)) => {
                    warn!(error = %e, "config watcher error");
                    return Some(ConfigEvent::Error(e.to_string()));
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        if !changed {
            return None;
        }
        match OverlayConfig::load(&self.path) {
            Ok(config) => {
                debug!(path = %self.path.display(), "overlay config reloaded");
                Some(ConfigEvent::Reloaded(config))
            }
            Err(e) => Some(ConfigEvent::Error(e.to_string())),
        }
    }
}
