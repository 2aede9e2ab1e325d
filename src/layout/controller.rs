//! Split-pane geometry and divider drag handling

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::pointer::{PointerCapture, PointerTracker};

/// Narrowest sidebar, in layout units
pub const MIN_SIDEBAR_WIDTH: u32 = 150;

/// Widest sidebar, in layout units
pub const MAX_SIDEBAR_WIDTH: u32 = 500;

/// Sidebar width before any drag
pub const DEFAULT_SIDEBAR_WIDTH: u32 = 250;

/// How a pointer position outside the allowed range is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizePolicy {
    /// Snap to the nearest bound
    #[default]
    Clamp,
    /// Keep the previous width
    Ignore,
}

/// Owns the sidebar width and the drag-resize interaction
#[derive(Debug)]
pub struct LayoutController {
    sidebar_width: u32,
    policy: ResizePolicy,
    tracker: PointerTracker,
    /// Present exactly while a drag is active
    capture: Option<PointerCapture>,
}

impl LayoutController {
    /// Create a controller with its own pointer tracker
    pub fn new(initial_width: u32, policy: ResizePolicy) -> Self {
        Self::with_tracker(initial_width, policy, PointerTracker::new())
    }

    /// Create a controller sharing `tracker` with the input layer
    pub fn with_tracker(initial_width: u32, policy: ResizePolicy, tracker: PointerTracker) -> Self {
        Self {
            sidebar_width: clamp_width(initial_width),
            policy,
            tracker,
            capture: None,
        }
    }

    pub fn sidebar_width(&self) -> u32 {
        self.sidebar_width
    }

    pub fn is_resizing(&self) -> bool {
        self.capture.is_some()
    }

    pub fn policy(&self) -> ResizePolicy {
        self.policy
    }

    /// Tracker the input layer consults before forwarding drag events
    pub fn tracker(&self) -> &PointerTracker {
        &self.tracker
    }

    /// Start a drag. A drag already in progress is left as is.
    pub fn begin_resize(&mut self) {
        if self.capture.is_some() {
            return;
        }
        self.capture = self.tracker.try_attach();
        debug!(width = self.sidebar_width, "Resize started");
    }

    /// Apply a pointer position; returns true if the width changed
    pub fn on_pointer_move(&mut self, x: u32) -> bool {
        if !self.is_resizing() {
            return false;
        }

        let next = match self.policy {
            ResizePolicy::Clamp => clamp_width(x),
            ResizePolicy::Ignore if in_range(x) => x,
            ResizePolicy::Ignore => return false,
        };

        let changed = next != self.sidebar_width;
        self.sidebar_width = next;
        changed
    }

    /// Finish a drag and detach pointer tracking
    pub fn end_resize(&mut self) {
        if self.capture.take().is_some() {
            debug!(width = self.sidebar_width, "Resize finished");
        }
    }

    /// Move the divider by `delta` units (keyboard resizing)
    pub fn nudge(&mut self, delta: i64) {
        let target = i64::from(self.sidebar_width) + delta;
        let target = target.clamp(i64::from(MIN_SIDEBAR_WIDTH), i64::from(MAX_SIDEBAR_WIDTH));
        self.sidebar_width = u32::try_from(target).unwrap_or(MIN_SIDEBAR_WIDTH);
    }

    /// Sidebar width in terminal columns for a given cell width
    pub fn sidebar_columns(&self, cell_width: u32) -> u16 {
        let cols = self.sidebar_width / cell_width.max(1);
        u16::try_from(cols).unwrap_or(u16::MAX)
    }
}

fn in_range(width: u32) -> bool {
    (MIN_SIDEBAR_WIDTH..=MAX_SIDEBAR_WIDTH).contains(&width)
}

fn clamp_width(width: u32) -> u32 {
    width.clamp(MIN_SIDEBAR_WIDTH, MAX_SIDEBAR_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_move_ignored_unless_resizing() {
        let mut layout = LayoutController::new(DEFAULT_SIDEBAR_WIDTH, ResizePolicy::Clamp);
        assert!(!layout.on_pointer_move(300));
        assert_eq!(layout.sidebar_width(), 250);

        layout.begin_resize();
        assert!(layout.on_pointer_move(300));
        assert_eq!(layout.sidebar_width(), 300);

        layout.end_resize();
        assert!(!layout.on_pointer_move(400));
        assert_eq!(layout.sidebar_width(), 300);
    }

    #[test]
    fn test_clamp_policy_snaps_to_bounds() {
        let mut layout = LayoutController::new(DEFAULT_SIDEBAR_WIDTH, ResizePolicy::Clamp);
        layout.begin_resize();

        layout.on_pointer_move(20);
        assert_eq!(layout.sidebar_width(), MIN_SIDEBAR_WIDTH);

        layout.on_pointer_move(9000);
        assert_eq!(layout.sidebar_width(), MAX_SIDEBAR_WIDTH);
    }

    #[test]
    fn test_ignore_policy_keeps_previous_width() {
        let mut layout = LayoutController::new(DEFAULT_SIDEBAR_WIDTH, ResizePolicy::Ignore);
        layout.begin_resize();

        layout.on_pointer_move(320);
        assert!(!layout.on_pointer_move(149));
        assert_eq!(layout.sidebar_width(), 320);
        assert!(!layout.on_pointer_move(501));
        assert_eq!(layout.sidebar_width(), 320);
    }

    #[test]
    fn test_resize_attaches_and_detaches_tracking() {
        let mut layout = LayoutController::new(DEFAULT_SIDEBAR_WIDTH, ResizePolicy::Clamp);
        let tracker = layout.tracker().clone();

        assert!(!tracker.is_attached());
        layout.begin_resize();
        assert!(layout.is_resizing());
        assert!(tracker.is_attached());

        // Second begin while dragging is not a second drag
        layout.begin_resize();
        layout.end_resize();
        assert!(!layout.is_resizing());
        assert!(!tracker.is_attached());
    }

    #[test]
    fn test_teardown_mid_drag_detaches_tracking() {
        let tracker = PointerTracker::new();
        let mut layout =
            LayoutController::with_tracker(DEFAULT_SIDEBAR_WIDTH, ResizePolicy::Clamp, tracker.clone());
        layout.begin_resize();
        assert!(tracker.is_attached());

        drop(layout);
        assert!(!tracker.is_attached());
    }

    #[test]
    fn test_initial_width_clamped() {
        let layout = LayoutController::new(10, ResizePolicy::Clamp);
        assert_eq!(layout.sidebar_width(), MIN_SIDEBAR_WIDTH);
    }

    #[test]
    fn test_nudge_and_columns() {
        let mut layout = LayoutController::new(DEFAULT_SIDEBAR_WIDTH, ResizePolicy::Clamp);
        layout.nudge(-1000);
        assert_eq!(layout.sidebar_width(), MIN_SIDEBAR_WIDTH);
        layout.nudge(50);
        assert_eq!(layout.sidebar_width(), 200);
        assert_eq!(layout.sidebar_columns(8), 25);
    }

    proptest! {
        #[test]
        fn prop_width_always_in_range(
            moves in proptest::collection::vec(0u32..2000, 1..50),
            ignore in any::<bool>(),
        ) {
            let policy = if ignore { ResizePolicy::Ignore } else { ResizePolicy::Clamp };
            let mut layout = LayoutController::new(DEFAULT_SIDEBAR_WIDTH, policy);
            layout.begin_resize();
            for x in moves {
                let before = layout.sidebar_width();
                layout.on_pointer_move(x);
                let after = layout.sidebar_width();
                prop_assert!((MIN_SIDEBAR_WIDTH..=MAX_SIDEBAR_WIDTH).contains(&after));
                if ignore && !(MIN_SIDEBAR_WIDTH..=MAX_SIDEBAR_WIDTH).contains(&x) {
                    prop_assert_eq!(before, after);
                }
            }
        }
    }
}
