//! Global pointer tracking
//!
//! The terminal delivers every mouse event to the whole application. Drag and
//! move events are only wanted while the divider is being dragged, so they are
//! gated on a process-wide flag that is held through a [`PointerCapture`]
//! guard. Dropping the guard detaches tracking on every exit path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

/// Shared switch for global pointer-move/pointer-up tracking
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    attached: Arc<AtomicBool>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach global tracking. Returns `None` if a capture is already live.
    pub fn try_attach(&self) -> Option<PointerCapture> {
        self.attached
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| {
                debug!("Pointer tracking attached");
                PointerCapture {
                    attached: self.attached.clone(),
                }
            })
    }

    /// Whether pointer-move events should currently be delivered
    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }
}

/// Live pointer capture; tracking stays attached until this is dropped
#[derive(Debug)]
pub struct PointerCapture {
    attached: Arc<AtomicBool>,
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        self.attached.store(false, Ordering::SeqCst);
        debug!("Pointer tracking detached");
    }
}
