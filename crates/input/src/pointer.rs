use glam::Vec2;

/// One pointer observation handed to the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Cursor position in window pixels.
    pub position: Vec2,
    /// Whether the drag button is held for this sample.
    pub dragging: bool,
}

/// Tracks the cursor position and drag button state between window events.
///
/// Button events carry no position, so presses and releases are sampled at
/// the last cursor position seen.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    position: Vec2,
    dragging: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Cursor moved to `position`.
    pub fn moved(&mut self, position: Vec2) -> PointerSample {
        self.position = position;
        self.sample()
    }

    /// Drag button went down.
    pub fn pressed(&mut self) -> PointerSample {
        self.dragging = true;
        tracing::trace!(x = self.position.x, y = self.position.y, "drag start");
        self.sample()
    }

    /// Drag button went up.
    pub fn released(&mut self) -> PointerSample {
        self.dragging = false;
        tracing::trace!(x = self.position.x, y = self.position.y, "drag end");
        self.sample()
    }

    fn sample(&self) -> PointerSample {
        PointerSample {
            position: self.position,
            dragging: self.dragging,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_without_button_are_not_drags() {
        let mut tracker = PointerTracker::new();
        let s = tracker.moved(Vec2::new(5.0, 7.0));
        assert_eq!(s.position, Vec2::new(5.0, 7.0));
        assert!(!s.dragging);
    }

    #[test]
    fn press_samples_last_position() {
        let mut tracker = PointerTracker::new();
        tracker.moved(Vec2::new(12.0, 3.0));
        let s = tracker.pressed();
        assert_eq!(s.position, Vec2::new(12.0, 3.0));
        assert!(s.dragging);
        assert!(tracker.is_dragging());
    }

    #[test]
    fn moves_while_held_are_drags_until_release() {
        let mut tracker = PointerTracker::new();
        tracker.pressed();
        assert!(tracker.moved(Vec2::new(1.0, 1.0)).dragging);
        assert!(tracker.moved(Vec2::new(2.0, 1.0)).dragging);

        let released = tracker.released();
        assert!(!released.dragging);
        assert_eq!(released.position, Vec2::new(2.0, 1.0));
        assert!(!tracker.moved(Vec2::new(3.0, 1.0)).dragging);
    }
}
