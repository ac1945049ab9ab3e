//! Pointer drag state machine shared by image and overlay dragging.
//!
//! `Idle -> Dragging` on pointer/touch down over the target, capturing where
//! the pointer and the target started. Each move while dragging yields
//! `start_offset + (pointer - start_pointer)`. Up or leave returns to `Idle`.
//! No momentum is carried between drags.

use crate::geometry::Point;

/// Drag state of one draggable target.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// Pointer position at drag start.
        start_pointer: Point,
        /// Target offset at drag start.
        start_offset: Point,
    },
}

/// Tracks [`DragState`] transitions for a single target.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragTracker {
    state: DragState,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Start dragging. A second `begin` while dragging restarts from the new
    /// pointer/offset pair.
    pub fn begin(&mut self, pointer: Point, offset: Point) {
        self.state = DragState::Dragging {
            start_pointer: pointer,
            start_offset: offset,
        };
    }

    /// Unclamped target offset for the current pointer, or `None` when idle.
    pub fn update(&self, pointer: Point) -> Option<Point> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging {
                start_pointer,
                start_offset,
            } => Some(start_offset.offset_by(start_pointer, pointer)),
        }
    }

    /// Return to idle. Returns whether a drag was actually in progress.
    pub fn end(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.state = DragState::Idle;
        was_dragging
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_tracker_ignores_moves() {
        let tracker = DragTracker::new();
        assert_eq!(tracker.update(Point::new(5.0, 5.0)), None);
    }

    #[test]
    fn move_applies_delta_from_start() {
        let mut tracker = DragTracker::new();
        tracker.begin(Point::new(100.0, 100.0), Point::new(10.0, 20.0));
        assert_eq!(
            tracker.update(Point::new(110.0, 95.0)),
            Some(Point::new(20.0, 15.0))
        );
        // Deltas are always measured from the drag start, not the last move.
        assert_eq!(
            tracker.update(Point::new(120.0, 100.0)),
            Some(Point::new(30.0, 20.0))
        );
    }

    #[test]
    fn end_returns_to_idle() {
        let mut tracker = DragTracker::new();
        assert!(!tracker.end());
        tracker.begin(Point::default(), Point::default());
        assert!(tracker.is_dragging());
        assert!(tracker.end());
        assert_eq!(tracker.state(), DragState::Idle);
        assert_eq!(tracker.update(Point::new(1.0, 1.0)), None);
    }
}
