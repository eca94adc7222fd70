//! Global listener bookkeeping for live gestures.
//!
//! While a session is live it owns a pointer-move/pointer-up listener pair
//! installed globally (not on the sticker element), so the gesture keeps
//! tracking when the pointer leaves the sticker's bounds. The host reads the
//! table to decide where to route global events. Each pair is owned by a
//! `CaptureGuard` and removed when the guard drops.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::trace;

/// Event family a listener pair is installed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputFamily {
    Pointer,
    Touch,
}

/// Which session installed a listener pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionKind {
    Move,
    Resize,
    Rotate,
    Placement,
}

/// One installed move/up listener pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListenerPair {
    pub id: u64,
    pub family: InputFamily,
    pub kind: SessionKind,
}

#[derive(Debug, Default)]
struct CaptureTable {
    next_id: u64,
    listeners: Vec<ListenerPair>,
}

/// Shared table of installed global listener pairs.
#[derive(Clone, Debug, Default)]
pub struct PointerCapture {
    table: Arc<Mutex<CaptureTable>>,
}

impl PointerCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a listener pair; it stays installed until the guard drops.
    pub fn acquire(&self, family: InputFamily, kind: SessionKind) -> CaptureGuard {
        let mut table = self.table.lock();
        let id = table.next_id;
        table.next_id += 1;
        table.listeners.push(ListenerPair { id, family, kind });
        trace!(id, ?family, ?kind, "installed listener pair");
        CaptureGuard {
            id,
            table: Arc::clone(&self.table),
        }
    }

    /// Snapshot of the installed pairs, oldest first
    pub fn listeners(&self) -> Vec<ListenerPair> {
        self.table.lock().listeners.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.table.lock().listeners.len()
    }

    /// True if any pair is installed for `family`
    pub fn is_capturing(&self, family: InputFamily) -> bool {
        self.table.lock().listeners.iter().any(|l| l.family == family)
    }

    pub fn is_held_by(&self, kind: SessionKind) -> bool {
        self.table.lock().listeners.iter().any(|l| l.kind == kind)
    }
}

/// Owns one installed listener pair.
#[must_use = "dropping the guard removes the listener pair immediately"]
#[derive(Debug)]
pub struct CaptureGuard {
    id: u64,
    table: Arc<Mutex<CaptureTable>>,
}

impl CaptureGuard {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        let mut table = self.table.lock();
        table.listeners.retain(|l| l.id != self.id);
        trace!(id = self.id, "removed listener pair");
    }
}
