//! Per-surface touch tracking

use super::{classify, Direction, Point, DEFAULT_MIN_SWIPE_DISTANCE};

/// Tracks the in-flight gesture of one touch surface.
///
/// Holds at most one pending start point. Every `touch_end` consumes it,
/// so a skipped touch-start can never pair with a stale point.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    min_distance: f64,
    pending: Option<Point>,
}

impl SwipeTracker {
    pub fn new(min_distance: f64) -> Self {
        Self {
            min_distance,
            pending: None,
        }
    }

    #[cfg(test)]
    pub fn pending(&self) -> Option<Point> {
        self.pending
    }

    /// Record the start of a gesture.
    ///
    /// Returns true when default scrolling should be suppressed, which is the
    /// case for touches inside the board container.
    pub fn touch_start(&mut self, at: Point, in_board: bool) -> bool {
        self.pending = Some(at);
        in_board
    }

    /// Returns true when scrolling should be suppressed for this move.
    pub fn touch_move(&self, in_board: bool) -> bool {
        in_board
    }

    /// Finish the gesture and classify it against the pending start point.
    pub fn touch_end(&mut self, at: Point) -> Option<Direction> {
        let start = self.pending.take()?;
        classify(start, at, self.min_distance)
    }

    /// Drop any in-flight gesture (touch cancelled or session reset).
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SWIPE_DISTANCE)
    }
}
