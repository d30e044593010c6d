use std::time::{Duration, Instant};

pub const DEFAULT_TAP_THRESHOLD: Duration = Duration::from_millis(500);

/// How a press-release pair on the focus button was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldKind {
    Tap,
    Hold,
}

/// Per-layer focus/visibility state machine, driven by a single designated
/// button. Holding the button grants focus so the layer's secondary controls
/// go live; a quick tap (release before the threshold) additionally toggles
/// the layer's visibility. A hold at or past the threshold leaves visibility
/// untouched.
#[derive(Debug, Clone)]
pub struct FocusState {
    focused: bool,
    visible: bool,
    acquired_at: Option<Instant>,
    tap_threshold: Duration,
}

impl FocusState {
    pub fn new(initial_visible: bool) -> Self {
        Self::with_threshold(initial_visible, DEFAULT_TAP_THRESHOLD)
    }

    pub fn with_threshold(initial_visible: bool, tap_threshold: Duration) -> Self {
        Self { focused: false, visible: initial_visible, acquired_at: None, tap_threshold }
    }

    pub fn press(&mut self, now: Instant) {
        self.focused = true;
        self.acquired_at = Some(now);
    }

    /// Returns how the press was classified, or `None` for a release with no
    /// matching press (possible when the device connects mid-hold).
    pub fn release(&mut self, now: Instant) -> Option<HoldKind> {
        self.focused = false;
        let acquired = self.acquired_at.take()?;
        let held = now.duration_since(acquired);
        if held < self.tap_threshold {
            self.visible = !self.visible;
            Some(HoldKind::Tap)
        } else {
            Some(HoldKind::Hold)
        }
    }

    pub fn focused(&self) -> bool {
        self.focused
    }

    pub fn visible(&self) -> bool {
        self.visible
    }
}
